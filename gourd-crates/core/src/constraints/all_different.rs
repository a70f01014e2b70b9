use super::binary_not_equals;
use super::Constraint;
use crate::propagators::AllDifferentArgs;
use crate::variables::IntegerVariable;

/// Creates the [`Constraint`] that enforces that all the given `variables` are distinct.
///
/// Every value which takes part in no assignment of pairwise distinct values is removed
/// (arc consistency), using a maximum matching between the variables and their values.
pub fn all_different<Var: IntegerVariable + 'static>(
    variables: impl Into<Box<[Var]>>,
) -> Constraint {
    Constraint::new("all_different").with_propagator(AllDifferentArgs {
        variables: variables.into(),
    })
}

/// Creates the [`Constraint`] that enforces that all the given `variables` are distinct,
/// decomposed into a disequality for every pair of variables.
///
/// Cheaper per call than [`all_different`], but values are only removed once a variable is
/// assigned.
pub fn all_different_pairwise<Var: IntegerVariable + 'static>(
    variables: impl Into<Box<[Var]>>,
) -> Constraint {
    let variables: Box<[Var]> = variables.into();
    let mut constraint = Constraint::new("all_different_pairwise");

    for i in 0..variables.len() {
        for j in i + 1..variables.len() {
            constraint = constraint.merge(binary_not_equals(
                variables[i].clone(),
                variables[j].clone(),
            ));
        }
    }

    constraint
}

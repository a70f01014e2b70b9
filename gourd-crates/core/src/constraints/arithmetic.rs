use super::Constraint;
use crate::propagators::BinaryNotEqualsArgs;
use crate::propagators::MaximumArgs;
use crate::variables::IntegerVariable;

/// Creates the [`Constraint`] `a != b`.
pub fn binary_not_equals<AVar, BVar>(a: AVar, b: BVar) -> Constraint
where
    AVar: IntegerVariable + 'static,
    BVar: IntegerVariable + 'static,
{
    Constraint::new("binary_not_equals").with_propagator(BinaryNotEqualsArgs { a, b })
}

/// Creates the [`Constraint`] `max(array) = rhs`, propagated to bounds consistency.
///
/// The maximum of an empty array is left unconstrained.
pub fn maximum<ElementVar, Rhs>(array: impl Into<Box<[ElementVar]>>, rhs: Rhs) -> Constraint
where
    ElementVar: IntegerVariable + 'static,
    Rhs: IntegerVariable + 'static,
{
    Constraint::new("maximum").with_propagator(MaximumArgs {
        array: array.into(),
        rhs,
    })
}

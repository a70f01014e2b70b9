use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::IntegerVariable;
use crate::propagation::DomainEvents;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::PropagationContextMut;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`MaximumPropagator`].
#[derive(Clone, Debug)]
pub(crate) struct MaximumArgs<ElementVar, Rhs> {
    pub(crate) array: Box<[ElementVar]>,
    pub(crate) rhs: Rhs,
}

impl<ElementVar, Rhs> PropagatorConstructor for MaximumArgs<ElementVar, Rhs>
where
    ElementVar: IntegerVariable + 'static,
    Rhs: IntegerVariable + 'static,
{
    type PropagatorImpl = MaximumPropagator<ElementVar, Rhs>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let MaximumArgs { array, rhs } = self;

        for (index, element) in array.iter().enumerate() {
            context.register(element.clone(), DomainEvents::BOUNDS, LocalId::from(index as u32));
        }
        context.register(
            rhs.clone(),
            DomainEvents::BOUNDS,
            LocalId::from(array.len() as u32),
        );

        MaximumPropagator { array, rhs }
    }
}

/// Bounds-consistent propagator which enforces `max(array) = rhs`.
#[derive(Clone, Debug)]
pub(crate) struct MaximumPropagator<ElementVar, Rhs> {
    array: Box<[ElementVar]>,
    rhs: Rhs,
}

impl<ElementVar, Rhs> Propagator for MaximumPropagator<ElementVar, Rhs>
where
    ElementVar: IntegerVariable + 'static,
    Rhs: IntegerVariable + 'static,
{
    fn name(&self) -> &str {
        "Maximum"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn is_idempotent(&self) -> bool {
        false
    }

    fn propagate(&mut self, mut context: PropagationContextMut) -> PropagationStatusCP {
        if self.array.is_empty() {
            return Ok(());
        }

        // Every element is at most the maximum.
        let rhs_ub = context.upper_bound(&self.rhs);
        let mut max_lb = i32::MIN;
        let mut max_ub = i32::MIN;
        for element in self.array.iter() {
            let _ = context.set_upper_bound(element, rhs_ub)?;

            max_lb = max_lb.max(context.lower_bound(element));
            max_ub = max_ub.max(context.upper_bound(element));
        }

        // The maximum is at least the largest lower bound, and at most the largest upper bound.
        let _ = context.set_lower_bound(&self.rhs, max_lb)?;
        let _ = context.set_upper_bound(&self.rhs, max_ub)?;

        // If a single element can still reach the lower bound of the maximum, that element
        // is the maximum.
        let rhs_lb = context.lower_bound(&self.rhs);
        let mut support = None;
        for element in self.array.iter() {
            if context.upper_bound(element) >= rhs_lb {
                if support.is_some() {
                    support = None;
                    break;
                }
                support = Some(element);
            }
        }

        if let Some(support) = support {
            let _ = context.set_lower_bound(support, rhs_lb)?;
        }

        Ok(())
    }

    fn is_entailed(&self, context: PropagationContext) -> Entailment {
        let rhs_lb = context.lower_bound(&self.rhs);
        let rhs_ub = context.upper_bound(&self.rhs);

        let max_lb = self.array.iter().map(|element| context.lower_bound(element)).max();
        let max_ub = self.array.iter().map(|element| context.upper_bound(element)).max();

        match (max_lb, max_ub) {
            (Some(max_lb), Some(max_ub)) if max_ub < rhs_lb || max_lb > rhs_ub => {
                Entailment::Disentailed
            }
            (Some(max_lb), Some(max_ub)) if max_lb == max_ub && rhs_lb == rhs_ub => {
                if max_lb == rhs_lb {
                    Entailment::Entailed
                } else {
                    Entailment::Disentailed
                }
            }
            _ => Entailment::Undecided,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Conflict;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn rhs_bounds_follow_the_elements() {
        let mut solver = TestSolver::default();
        let a = solver.new_bounded_variable(0, 6);
        let b = solver.new_bounded_variable(0, 10);
        let rhs = solver.new_bounded_variable(-20, 20);

        let _ = solver
            .new_propagator(MaximumArgs {
                array: [a, b].into(),
                rhs,
            })
            .expect("no empty domains");

        solver.assert_bounds(rhs, 0, 10);
        solver.assert_bounds(a, 0, 6);
        solver.assert_bounds(b, 0, 10);
    }

    #[test]
    fn elements_are_bounded_by_the_rhs() {
        let mut solver = TestSolver::default();
        let a = solver.new_bounded_variable(1, 5);
        let b = solver.new_bounded_variable(2, 8);
        let rhs = solver.new_bounded_variable(0, 4);

        let _ = solver
            .new_propagator(MaximumArgs {
                array: [a, b].into(),
                rhs,
            })
            .expect("no empty domains");

        solver.assert_bounds(a, 1, 4);
        solver.assert_bounds(b, 2, 4);
        solver.assert_bounds(rhs, 2, 4);
    }

    #[test]
    fn single_support_takes_the_lower_bound_of_the_rhs() {
        let mut solver = TestSolver::default();
        let a = solver.new_bounded_variable(1, 3);
        let b = solver.new_bounded_variable(0, 9);
        let rhs = solver.new_bounded_variable(5, 9);

        let _ = solver
            .new_propagator(MaximumArgs {
                array: [a, b].into(),
                rhs,
            })
            .expect("no empty domains");

        solver.assert_bounds(b, 5, 9);
        solver.assert_bounds(a, 1, 3);
    }

    #[test]
    fn maximum_of_constants_is_fixed() {
        let mut solver = TestSolver::default();
        let rhs = solver.new_bounded_variable(0, 10);

        let _ = solver
            .new_propagator(MaximumArgs {
                array: [2, 7].into(),
                rhs,
            })
            .expect("no empty domains");

        solver.assert_bounds(rhs, 7, 7);
    }

    #[test]
    fn maximum_below_every_element_is_a_conflict() {
        let mut solver = TestSolver::default();
        let a = solver.new_bounded_variable(5, 6);
        let rhs = solver.new_bounded_variable(0, 4);

        let result = solver.new_propagator(MaximumArgs {
            array: [a].into(),
            rhs,
        });

        assert!(matches!(result, Err(Conflict::EmptyDomain(_))));
    }

    #[test]
    fn entailment_on_fixed_domains() {
        let mut solver = TestSolver::default();
        let a = solver.new_bounded_variable(0, 6);
        let b = solver.new_bounded_variable(0, 10);
        let rhs = solver.new_bounded_variable(0, 10);

        let handle = solver
            .new_propagator(MaximumArgs {
                array: [a, b].into(),
                rhs,
            })
            .expect("no empty domains");
        assert_eq!(
            solver.entailment(handle.propagator_id()),
            Entailment::Undecided
        );

        solver.fix(a, 3).expect("non-empty domain");
        solver.fix(b, 4).expect("non-empty domain");
        solver.fix(rhs, 4).expect("non-empty domain");

        assert_eq!(
            solver.entailment(handle.propagator_id()),
            Entailment::Entailed
        );
    }
}

use super::OptimisationDirection;
use crate::basic_types::EmptyDomain;
use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::DomainId;
use crate::propagation::Entailment;
use crate::propagation::PropagationContext;
use crate::propagation::PropagationContextMut;
use crate::propagation::Priority;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

#[derive(Clone, Debug)]
pub(crate) struct ObjectiveBoundArgs {
    pub(crate) objective: DomainId,
    pub(crate) direction: OptimisationDirection,
}

impl PropagatorConstructor for ObjectiveBoundArgs {
    type PropagatorImpl = ObjectiveBound;

    fn create(self, _context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        // The bound only changes between calls, after which the propagator is enqueued
        // explicitly; no domain events are needed.
        ObjectiveBound {
            objective: self.objective,
            direction: self.direction,
            best_value: None,
        }
    }
}

/// Requires the objective to be strictly better than the best value known.
///
/// The best value is changed from outside propagation (when a solution is found), so this
/// propagator is re-run after every restore.
#[derive(Clone, Debug)]
pub(crate) struct ObjectiveBound {
    objective: DomainId,
    direction: OptimisationDirection,
    best_value: Option<i32>,
}

impl ObjectiveBound {
    pub(crate) fn tighten(&mut self, value: i32) {
        if self
            .best_value
            .map_or(true, |best| self.direction.is_improvement(value, best))
        {
            self.best_value = Some(value);
        }
    }
}

impl Propagator for ObjectiveBound {
    fn name(&self) -> &str {
        "ObjectiveBound"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContextMut) -> PropagationStatusCP {
        let Some(best) = self.best_value else {
            return Ok(());
        };

        let _ = match self.direction {
            OptimisationDirection::Minimise => {
                let bound = best.checked_sub(1).ok_or(EmptyDomain)?;
                context.set_upper_bound(&self.objective, bound)?
            }
            OptimisationDirection::Maximise => {
                let bound = best.checked_add(1).ok_or(EmptyDomain)?;
                context.set_lower_bound(&self.objective, bound)?
            }
        };

        Ok(())
    }

    fn is_entailed(&self, context: PropagationContext) -> Entailment {
        let Some(best) = self.best_value else {
            return Entailment::Entailed;
        };

        let lower_bound = context.lower_bound(&self.objective);
        let upper_bound = context.upper_bound(&self.objective);
        let (always, never) = match self.direction {
            OptimisationDirection::Minimise => (upper_bound < best, lower_bound >= best),
            OptimisationDirection::Maximise => (lower_bound > best, upper_bound <= best),
        };

        if always {
            Entailment::Entailed
        } else if never {
            Entailment::Disentailed
        } else {
            Entailment::Undecided
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn no_bound_means_no_pruning() {
        let mut solver = TestSolver::default();
        let objective = solver.new_variable(0, 10);

        let _ = solver
            .new_propagator(ObjectiveBoundArgs {
                objective,
                direction: OptimisationDirection::Minimise,
            })
            .expect("no conflict");

        solver.assert_bounds(objective, 0, 10);
    }

    #[test]
    fn tightened_bound_is_enforced() {
        let mut solver = TestSolver::default();
        let objective = solver.new_variable(0, 10);
        let handle = solver
            .new_propagator(ObjectiveBoundArgs {
                objective,
                direction: OptimisationDirection::Maximise,
            })
            .expect("no conflict");

        solver.propagator_mut(handle).tighten(4);
        solver.propagator_mut(handle).tighten(2);
        solver.enqueue(handle.propagator_id());
        solver.propagate().expect("no conflict");

        solver.assert_bounds(objective, 5, 10);
    }

    #[test]
    fn bound_beyond_the_domain_is_a_conflict() {
        let mut solver = TestSolver::default();
        let objective = solver.new_variable(3, 10);
        let handle = solver
            .new_propagator(ObjectiveBoundArgs {
                objective,
                direction: OptimisationDirection::Minimise,
            })
            .expect("no conflict");

        solver.propagator_mut(handle).tighten(3);
        solver.enqueue(handle.propagator_id());

        assert!(solver.propagate().is_err());
    }
}

use crate::basic_types::PropagationStatusCP;
use crate::engine::predicates::Predicate;
use crate::propagation::Entailment;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::PropagationContextMut;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`PredicatePropagator`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct PredicateArgs {
    pub(crate) predicate: Predicate,
}

impl PropagatorConstructor for PredicateArgs {
    type PropagatorImpl = PredicatePropagator;

    fn create(self, _context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        // Applying the predicate once suffices; nothing is watched.
        PredicatePropagator {
            predicate: self.predicate,
        }
    }
}

/// Applies a unary constraint such as `[x <= 5]` or `[x != 3]` to the domain of its variable.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PredicatePropagator {
    predicate: Predicate,
}

impl Propagator for PredicatePropagator {
    fn name(&self) -> &str {
        "Predicate"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContextMut) -> PropagationStatusCP {
        let _ = context.post(self.predicate)?;
        context.set_passive();
        Ok(())
    }

    fn is_entailed(&self, context: PropagationContext) -> Entailment {
        match context.evaluate_predicate(self.predicate) {
            Some(true) => Entailment::Entailed,
            Some(false) => Entailment::Disentailed,
            None => Entailment::Undecided,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Conflict;
    use crate::engine::test_solver::TestSolver;
    use crate::predicate;

    #[test]
    fn predicate_is_applied_once() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);

        let handle = solver
            .new_propagator(PredicateArgs {
                predicate: predicate!(x <= 5),
            })
            .expect("non-empty domain");

        solver.assert_bounds(x, 0, 5);
        assert!(solver.state.is_passive(handle.propagator_id()));
        assert_eq!(
            solver.entailment(handle.propagator_id()),
            Entailment::Entailed
        );
    }

    #[test]
    fn disequality_punches_a_hole() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 3);

        let _ = solver
            .new_propagator(PredicateArgs {
                predicate: predicate!(x != 2),
            })
            .expect("non-empty domain");

        assert_eq!(solver.domain(x), vec![0, 1, 3]);
    }

    #[test]
    fn unsatisfiable_predicate_is_a_conflict() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 3);

        let result = solver.new_propagator(PredicateArgs {
            predicate: predicate!(x >= 4),
        });

        assert!(matches!(result, Err(Conflict::EmptyDomain(_))));
    }
}

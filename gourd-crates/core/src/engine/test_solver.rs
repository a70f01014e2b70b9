#![cfg(test)]
//! This module exposes helpers that aid testing of CP propagators. The [`TestSolver`] allows
//! setting up specific scenarios under which to test the various operations of a propagator.
use crate::basic_types::Conflict;
use crate::basic_types::EmptyDomain;
use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::State;
use crate::predicate;
use crate::propagation::Entailment;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;

/// A container for CP variables and propagators, which can be used to test propagators.
#[derive(Debug, Default)]
pub(crate) struct TestSolver {
    pub(crate) state: State,
}

impl TestSolver {
    /// Creates a variable with domain `[lb, ub]` which supports holes.
    pub(crate) fn new_variable(&mut self, lb: i32, ub: i32) -> DomainId {
        self.state.new_enumerated_variable(lb, ub, None)
    }

    /// Creates a variable with domain `[lb, ub]` which only tracks its bounds.
    pub(crate) fn new_bounded_variable(&mut self, lb: i32, ub: i32) -> DomainId {
        self.state.new_interval_variable(lb, ub, None)
    }

    pub(crate) fn new_sparse_variable(&mut self, values: Vec<i32>) -> DomainId {
        self.state.new_sparse_variable(values, None)
    }

    /// Adds the propagator and propagates to a fixed point.
    pub(crate) fn new_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, Conflict>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        let handle = self.state.add_propagator(constructor, false);
        self.state.propagate_to_fixed_point()?;
        Ok(handle)
    }

    pub(crate) fn propagate(&mut self) -> PropagationStatusCP {
        self.state.propagate_to_fixed_point()
    }

    pub(crate) fn propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> &P {
        self.state
            .get_propagator(handle)
            .expect("the propagator is present")
    }

    pub(crate) fn propagator_mut<P: Propagator>(&mut self, handle: PropagatorHandle<P>) -> &mut P {
        self.state
            .get_propagator_mut(handle)
            .expect("the propagator is present")
    }

    pub(crate) fn enqueue(&mut self, propagator_id: PropagatorId) {
        self.state.enqueue_propagator(propagator_id);
    }

    pub(crate) fn entailment(&self, propagator_id: PropagatorId) -> Entailment {
        self.state
            .entailment(propagator_id)
            .expect("the propagator is present")
    }

    pub(crate) fn contains<Var: IntegerVariable>(&self, var: Var, value: i32) -> bool {
        self.state.contains(&var, value)
    }

    pub(crate) fn lower_bound(&self, var: DomainId) -> i32 {
        self.state.lower_bound(&var)
    }

    pub(crate) fn upper_bound(&self, var: DomainId) -> i32 {
        self.state.upper_bound(&var)
    }

    pub(crate) fn domain(&self, var: DomainId) -> Vec<i32> {
        self.state.domain(&var)
    }

    pub(crate) fn assert_bounds(&self, var: DomainId, lb: i32, ub: i32) {
        let actual_lb = self.lower_bound(var);
        let actual_ub = self.upper_bound(var);

        assert_eq!(
            (lb, ub),
            (actual_lb, actual_ub),
            "The expected bounds [{lb}..{ub}] did not match the actual bounds [{actual_lb}..{actual_ub}]"
        );
    }

    pub(crate) fn remove(&mut self, var: DomainId, value: i32) -> Result<(), EmptyDomain> {
        let _ = self.state.post(predicate!(var != value))?;
        Ok(())
    }

    pub(crate) fn set_lower_bound(&mut self, var: DomainId, bound: i32) -> Result<(), EmptyDomain> {
        let _ = self.state.post(predicate!(var >= bound))?;
        Ok(())
    }

    pub(crate) fn set_upper_bound(&mut self, var: DomainId, bound: i32) -> Result<(), EmptyDomain> {
        let _ = self.state.post(predicate!(var <= bound))?;
        Ok(())
    }

    pub(crate) fn fix(&mut self, var: DomainId, value: i32) -> Result<(), EmptyDomain> {
        let _ = self.state.post(predicate!(var == value))?;
        Ok(())
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.state.new_checkpoint();
    }

    pub(crate) fn restore_to(&mut self, checkpoint: usize) {
        self.state.restore_to(checkpoint);
    }
}

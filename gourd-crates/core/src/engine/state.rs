use log::trace;
use log::warn;

use crate::basic_types::EmptyDomain;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::Solution;
use crate::containers::KeyedVec;
use crate::create_statistics_struct;
use crate::engine::cp::Assignments;
use crate::engine::cp::PropagatorQueue;
use crate::engine::environment::EnvironmentKind;
use crate::engine::environment::StoredInteger;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::WatchListDomainEvents;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::NonIdempotencePolicy;
use crate::engine::SolverOptions;
use crate::gourd_assert_eq_simple;
use crate::gourd_assert_simple;
use crate::propagation::EnqueueDecision;
use crate::propagation::Entailment;
use crate::propagation::PropagationContext;
use crate::propagation::PropagationContextMut;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::propagation::store::PropagatorStore;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(
    /// Counters of the propagation engine.
    pub EngineStatistics {
        /// The number of calls to [`Propagator::propagate`] and
        /// [`Propagator::propagate_from_scratch`].
        num_propagator_calls: u64,
        /// The number of propagation cycles which ended in a conflict.
        num_conflicts: u64,
        /// The number of times a non-idempotent propagator was woken up by its own changes.
        num_self_wakeups: u64,
        /// The number of calls made when the queue ran empty.
        num_extra_calls: u64,
    }
);

/// The session object of the solver: the domains (in their reversible environment), the
/// propagators, the watch lists linking the two and the propagator queue.
///
/// Variables and propagators are stored in arenas and refer to each other through
/// [`DomainId`]s and [`PropagatorId`]s.
#[derive(Debug, Clone)]
pub struct State {
    pub(crate) assignments: Assignments,
    propagators: PropagatorStore,
    propagator_queue: PropagatorQueue,
    watch_list: WatchListDomainEvents,
    /// For every propagator, the domains it watches; used to unwatch removed propagators.
    watched_domains: KeyedVec<PropagatorId, Vec<DomainId>>,
    /// `1` while the propagator is active, `0` once it set itself passive.
    activity: KeyedVec<PropagatorId, StoredInteger>,
    needs_initial_propagation: KeyedVec<PropagatorId, bool>,
    /// Temporary propagators with the world they were posted in, in posting order.
    temporary_propagators: Vec<(usize, PropagatorId)>,
    /// Propagators which are re-run from scratch whenever the state is restored to a world
    /// below the given threshold.
    rerun_after_restore: Vec<(usize, PropagatorId)>,
    pending_extra_calls: Vec<PropagatorId>,
    non_idempotence: NonIdempotencePolicy,
    event_buffer: Vec<(DomainId, DomainEvent)>,
    statistics: EngineStatistics,
}

impl Default for State {
    fn default() -> Self {
        State::new(&SolverOptions::default())
    }
}

impl State {
    pub fn new(options: &SolverOptions) -> Self {
        State {
            assignments: Assignments::new(options.environment),
            propagators: PropagatorStore::default(),
            propagator_queue: PropagatorQueue::default(),
            watch_list: WatchListDomainEvents::default(),
            watched_domains: KeyedVec::default(),
            activity: KeyedVec::default(),
            needs_initial_propagation: KeyedVec::default(),
            temporary_propagators: Vec::new(),
            rerun_after_restore: Vec::new(),
            pending_extra_calls: Vec::new(),
            non_idempotence: options.non_idempotence,
            event_buffer: Vec::new(),
            statistics: EngineStatistics::default(),
        }
    }

    /// How this state restores its domains on backtrack.
    pub fn environment_kind(&self) -> EnvironmentKind {
        self.assignments.environment_kind()
    }

    pub fn statistics(&self) -> EngineStatistics {
        self.statistics
    }

    pub(crate) fn log_statistics(&self, statistic_logger: &StatisticLogger) {
        self.statistics
            .log(statistic_logger.attach_to_prefix("engine"));

        for (propagator_id, propagator) in self.propagators.iter() {
            let prefix = format!("{}_{}", propagator.name(), propagator_id.0);
            propagator.log_statistics(statistic_logger.attach_to_prefix(prefix));
        }
    }
}

/// Operations to create variables.
impl State {
    /// Creates a variable with domain `[lower_bound, upper_bound]` which only tracks its bounds.
    pub fn new_interval_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<String>,
    ) -> DomainId {
        self.watch_list.grow();
        self.assignments.grow(lower_bound, upper_bound, name)
    }

    /// Creates a variable with domain `[lower_bound, upper_bound]` which can represent holes.
    pub fn new_enumerated_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<String>,
    ) -> DomainId {
        gourd_assert_simple!(lower_bound <= upper_bound);
        self.new_sparse_variable((lower_bound..=upper_bound).collect(), name)
    }

    /// Creates a variable whose domain consists of exactly the provided values.
    pub fn new_sparse_variable(&mut self, values: Vec<i32>, name: Option<String>) -> DomainId {
        self.watch_list.grow();
        self.assignments.grow_enumerated(values, name)
    }
}

/// Operations to retrieve information about variables.
impl State {
    pub fn lower_bound<Var: IntegerVariable>(&self, variable: &Var) -> i32 {
        variable.lower_bound(&self.assignments)
    }

    pub fn upper_bound<Var: IntegerVariable>(&self, variable: &Var) -> i32 {
        variable.upper_bound(&self.assignments)
    }

    pub fn contains<Var: IntegerVariable>(&self, variable: &Var, value: i32) -> bool {
        variable.contains(&self.assignments, value)
    }

    pub fn size<Var: IntegerVariable>(&self, variable: &Var) -> u32 {
        variable.size(&self.assignments)
    }

    /// The value of the variable if it is fixed.
    pub fn fixed_value<Var: IntegerVariable>(&self, variable: &Var) -> Option<i32> {
        variable
            .is_fixed(&self.assignments)
            .then(|| variable.lower_bound(&self.assignments))
    }

    /// The values of the variable in increasing order.
    pub fn domain<Var: IntegerVariable>(&self, variable: &Var) -> Vec<i32> {
        variable.iterate_domain(&self.assignments).collect()
    }

    pub fn truth_value(&self, predicate: Predicate) -> Option<bool> {
        self.assignments.evaluate_predicate(predicate)
    }

    pub fn num_domains(&self) -> u32 {
        self.assignments.num_domains()
    }

    pub fn variable_name(&self, domain_id: DomainId) -> Option<&str> {
        self.assignments.get_name(domain_id)
    }

    /// Whether every domain is fixed.
    pub fn is_fully_assigned(&self) -> bool {
        self.assignments
            .get_domains()
            .all(|domain_id| self.assignments.is_domain_assigned(domain_id))
    }

    /// The first unfixed domain, in creation order.
    pub(crate) fn first_unfixed_domain(&self) -> Option<DomainId> {
        self.assignments
            .get_domains()
            .find(|&domain_id| !self.assignments.is_domain_assigned(domain_id))
    }

    /// Takes a snapshot of the current assignment; every domain has to be fixed.
    pub(crate) fn solution(&self) -> Solution {
        Solution::new(&self.assignments)
    }
}

/// Operations for adding and removing propagators.
impl State {
    /// Adds a propagator and enqueues it; the first call to the propagator runs
    /// [`Propagator::propagate_from_scratch`].
    ///
    /// A temporary propagator is removed when the current world is popped. A permanent
    /// propagator added above the root is re-run whenever the state is restored below the
    /// world it was added in, since its reductions of that world are undone.
    ///
    /// This does _not_ trigger propagation; call [`State::propagate_to_fixed_point`].
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
        temporary: bool,
    ) -> PropagatorHandle<Constructor::PropagatorImpl>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        let expected_id = self.propagators.next_id();
        let activity = self.assignments.new_stored_integer(1);
        let _ = self.watched_domains.push(Vec::new());
        let _ = self.activity.push(activity);
        let _ = self.needs_initial_propagation.push(true);

        let propagator =
            constructor.create(PropagatorConstructorContext::new(expected_id, self));
        let priority = propagator.priority();

        let propagator_id = self.propagators.add(Box::new(propagator));
        gourd_assert_eq_simple!(propagator_id, expected_id);

        let world = self.get_checkpoint();
        if temporary {
            self.temporary_propagators.push((world, propagator_id));
        } else if world > 0 {
            self.rerun_after_restore.push((world, propagator_id));
        }

        self.propagator_queue
            .enqueue_propagator(propagator_id, priority);

        PropagatorHandle::new(propagator_id)
    }

    /// Re-run the propagator from scratch after every restore, for propagators whose internal
    /// state changes outside of propagation.
    pub(crate) fn rerun_after_every_restore(&mut self, propagator_id: PropagatorId) {
        self.rerun_after_restore.push((usize::MAX, propagator_id));
    }

    fn remove_propagator(&mut self, propagator_id: PropagatorId) {
        for domain_id in std::mem::take(&mut self.watched_domains[propagator_id]) {
            self.watch_list.unwatch_all(domain_id, propagator_id);
        }

        self.rerun_after_restore
            .retain(|&(_, rerun_id)| rerun_id != propagator_id);

        if let Some(propagator) = self.propagators.remove(propagator_id) {
            trace!("removed temporary propagator {} ({propagator_id})", propagator.name());
        }
    }

    pub fn is_propagator_present(&self, propagator_id: PropagatorId) -> bool {
        self.propagators.contains(propagator_id)
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.iter().count()
    }

    /// Whether the propagator set itself passive in the current world.
    pub fn is_passive(&self, propagator_id: PropagatorId) -> bool {
        self.assignments.read_stored(self.activity[propagator_id]) == 0
    }

    /// The entailment of the propagator on the current domains, or [`None`] if it was removed.
    pub fn entailment(&self, propagator_id: PropagatorId) -> Option<Entailment> {
        self.propagators
            .get(propagator_id)
            .map(|propagator| propagator.is_entailed(PropagationContext::new(&self.assignments)))
    }

    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get_propagator(handle)
    }

    pub fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self.propagators.get_propagator_mut(handle)
    }

    pub(crate) fn enqueue_propagator(&mut self, propagator_id: PropagatorId) {
        if let Some(propagator) = self.propagators.get(propagator_id) {
            self.propagator_queue
                .enqueue_propagator(propagator_id, propagator.priority());
        }
    }

    pub(crate) fn watch_registration(
        &mut self,
        propagator_id: PropagatorId,
    ) -> (&mut WatchListDomainEvents, &mut Vec<DomainId>) {
        (&mut self.watch_list, &mut self.watched_domains[propagator_id])
    }
}

/// Operations for modifying the state.
impl State {
    /// Apply a [`Predicate`] to the [`State`].
    ///
    /// Returns `true` if a domain changed, and `false` if the predicate already held. This
    /// method does _not_ propagate.
    pub fn post(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        self.assignments.post_predicate(predicate)
    }

    /// The current world; `0` is the root.
    pub fn get_checkpoint(&self) -> usize {
        self.assignments.world_index()
    }

    /// Create a world which can be returned from with [`State::restore_to`].
    ///
    /// # Example
    /// ```
    /// use gourd_core::predicate;
    /// use gourd_core::state::State;
    ///
    /// let mut state = State::default();
    /// let variable = state.new_interval_variable(1, 10, Some("x1".into()));
    ///
    /// state.new_checkpoint();
    /// assert_eq!(state.get_checkpoint(), 1);
    ///
    /// let _ = state.post(predicate![variable <= 5]).unwrap();
    /// assert_eq!(state.upper_bound(&variable), 5);
    ///
    /// state.restore_to(0);
    /// assert_eq!(state.get_checkpoint(), 0);
    /// assert_eq!(state.upper_bound(&variable), 10);
    /// ```
    pub fn new_checkpoint(&mut self) {
        self.assignments.push_world();
    }

    /// Restores the state of world `checkpoint`, removing the temporary propagators posted in
    /// the worlds above it.
    ///
    /// Restoring to the current world is a no-op.
    pub fn restore_to(&mut self, checkpoint: usize) {
        gourd_assert_simple!(checkpoint <= self.get_checkpoint());

        if checkpoint == self.get_checkpoint() {
            return;
        }

        self.assignments.pop_until(checkpoint);

        while let Some(&(world, propagator_id)) = self.temporary_propagators.last() {
            if world <= checkpoint {
                break;
            }
            let _ = self.temporary_propagators.pop();
            self.remove_propagator(propagator_id);
        }

        self.propagator_queue.clear();
        self.pending_extra_calls.clear();

        let context = PropagationContext::new(&self.assignments);
        for propagator in self.propagators.iter_mut() {
            propagator.synchronise(context);
        }

        for &(threshold, propagator_id) in &self.rerun_after_restore {
            if checkpoint < threshold {
                if let Some(propagator) = self.propagators.get(propagator_id) {
                    self.needs_initial_propagation[propagator_id] = true;
                    self.propagator_queue
                        .enqueue_propagator(propagator_id, propagator.priority());
                }
            }
        }
    }

    /// Performs a single call to the propagator with the provided [`PropagatorId`] and
    /// notifies the watchers of the resulting changes.
    fn propagate(&mut self, propagator_id: PropagatorId) -> PropagationStatusCP {
        if self.is_passive(propagator_id) {
            return Ok(());
        }

        let activity = self.activity[propagator_id];
        let from_scratch = self.needs_initial_propagation[propagator_id];
        let Some(propagator) = self.propagators.get_mut(propagator_id) else {
            return Ok(());
        };

        self.statistics.num_propagator_calls += 1;

        let context = PropagationContextMut::new(&mut self.assignments, propagator_id, activity);
        let status = if from_scratch {
            propagator.propagate_from_scratch(context)
        } else {
            propagator.propagate(context)
        };

        if let Err(conflict) = &status {
            trace!("{} ({propagator_id}) failed: {conflict}", propagator.name());
            return status;
        }

        self.needs_initial_propagation[propagator_id] = false;
        self.notify_propagators(Some(propagator_id));

        Ok(())
    }

    /// Enqueues the watchers of every pending domain event. `cause` is the propagator which
    /// produced the events, if any.
    fn notify_propagators(&mut self, cause: Option<PropagatorId>) {
        let mut events = std::mem::take(&mut self.event_buffer);
        events.clear();
        events.extend(self.assignments.drain_pending_events());

        for &(domain_id, event) in &events {
            for propagator_var in self.watch_list.get_affected_propagators(event, domain_id) {
                let propagator_id = propagator_var.propagator;
                if self.assignments.read_stored(self.activity[propagator_id]) == 0 {
                    continue;
                }
                let Some(propagator) = self.propagators.get_mut(propagator_id) else {
                    continue;
                };

                if cause == Some(propagator_id) {
                    if propagator.is_idempotent() {
                        continue;
                    }

                    self.statistics.num_self_wakeups += 1;
                    match self.non_idempotence {
                        NonIdempotencePolicy::Ignore => {}
                        NonIdempotencePolicy::Log => warn!(
                            "{} ({propagator_id}) is not idempotent: woken up by its own {event} on {domain_id}",
                            propagator.name()
                        ),
                        NonIdempotencePolicy::ExtraCall => {
                            if !self.pending_extra_calls.contains(&propagator_id) {
                                self.pending_extra_calls.push(propagator_id);
                            }
                            continue;
                        }
                    }
                }

                let context = PropagationContext::new(&self.assignments);
                if propagator.notify(context, propagator_var.variable, event)
                    == EnqueueDecision::Enqueue
                {
                    self.propagator_queue
                        .enqueue_propagator(propagator_id, propagator.priority());
                }
            }
        }

        self.event_buffer = events;
    }

    /// Calls enqueued propagators until none is left (a fixed point) or one of them reports a
    /// conflict.
    ///
    /// On a conflict the queue is discarded; the only meaningful operation on a conflicting
    /// state is [`State::restore_to`].
    pub fn propagate_to_fixed_point(&mut self) -> PropagationStatusCP {
        self.notify_propagators(None);

        loop {
            while let Some(propagator_id) = self.propagator_queue.pop() {
                if let Err(conflict) = self.propagate(propagator_id) {
                    self.statistics.num_conflicts += 1;
                    self.propagator_queue.clear();
                    self.pending_extra_calls.clear();
                    self.assignments.clear_pending_events();
                    self.assignments.advance_delta_cycle();
                    return Err(conflict);
                }
            }

            if self.pending_extra_calls.is_empty() {
                break;
            }

            for propagator_id in std::mem::take(&mut self.pending_extra_calls) {
                self.statistics.num_extra_calls += 1;
                self.enqueue_propagator(propagator_id);
            }
        }

        self.assignments.advance_delta_cycle();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Conflict;
    use crate::engine::notifications::DomainEvents;
    use crate::propagation::LocalId;
    use crate::propagation::ReadDomains;

    /// Raises the lower bound of `x` by one per call until it reaches `target`; watching its own
    /// lower bound makes it rely on being called again.
    #[derive(Clone, Debug)]
    struct StepwiseLowerBound {
        x: DomainId,
        target: i32,
        calls: usize,
    }

    impl PropagatorConstructor for StepwiseLowerBound {
        type PropagatorImpl = StepwiseLowerBound;

        fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
            context.register(self.x, DomainEvents::LOWER_BOUND, LocalId::from(0));
            self
        }
    }

    impl Propagator for StepwiseLowerBound {
        fn name(&self) -> &str {
            "StepwiseLowerBound"
        }

        fn is_idempotent(&self) -> bool {
            false
        }

        fn propagate(&mut self, mut context: PropagationContextMut) -> PropagationStatusCP {
            self.calls += 1;
            let lower_bound = context.lower_bound(&self.x);
            if lower_bound < self.target {
                let _ = context.set_lower_bound(&self.x, lower_bound + 1)?;
            }
            Ok(())
        }
    }

    fn state_with_policy(policy: NonIdempotencePolicy) -> State {
        State::new(&SolverOptions {
            non_idempotence: policy,
            ..Default::default()
        })
    }

    #[test]
    fn non_idempotent_propagator_reaches_fixed_point_under_every_policy() {
        for policy in [
            NonIdempotencePolicy::Ignore,
            NonIdempotencePolicy::Log,
            NonIdempotencePolicy::ExtraCall,
        ] {
            let mut state = state_with_policy(policy);
            let x = state.new_interval_variable(0, 10, None);
            let _ = state.add_propagator(
                StepwiseLowerBound {
                    x,
                    target: 4,
                    calls: 0,
                },
                false,
            );

            state.propagate_to_fixed_point().unwrap();

            assert_eq!(state.lower_bound(&x), 4, "policy {policy}");
            assert_eq!(state.statistics().num_self_wakeups, 4, "policy {policy}");
        }
    }

    #[test]
    fn extra_calls_are_counted_when_the_queue_runs_empty() {
        let mut state = state_with_policy(NonIdempotencePolicy::ExtraCall);
        let x = state.new_interval_variable(0, 10, None);
        let handle = state.add_propagator(
            StepwiseLowerBound {
                x,
                target: 3,
                calls: 0,
            },
            false,
        );

        state.propagate_to_fixed_point().unwrap();

        assert_eq!(state.statistics().num_extra_calls, 3);
        assert_eq!(state.get_propagator(handle).unwrap().calls, 4);
    }

    #[test]
    fn conflicting_propagation_is_reported() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 2, None);
        let _ = state.add_propagator(
            StepwiseLowerBound {
                x,
                target: 5,
                calls: 0,
            },
            false,
        );

        let result = state.propagate_to_fixed_point();

        assert_eq!(result, Err(Conflict::EmptyDomain(EmptyDomain)));
        assert_eq!(state.statistics().num_conflicts, 1);
    }

    #[test]
    fn temporary_propagators_are_removed_on_restore() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 10, None);

        state.new_checkpoint();
        let handle = state.add_propagator(
            StepwiseLowerBound {
                x,
                target: 2,
                calls: 0,
            },
            true,
        );
        state.propagate_to_fixed_point().unwrap();
        assert_eq!(state.lower_bound(&x), 2);

        state.restore_to(0);

        assert_eq!(state.lower_bound(&x), 0);
        assert!(!state.is_propagator_present(handle.propagator_id()));

        let _ = state.post(crate::predicate!(x >= 1)).unwrap();
        state.propagate_to_fixed_point().unwrap();
        assert_eq!(state.lower_bound(&x), 1);
    }

    #[test]
    fn permanent_propagators_added_in_a_world_are_rerun_after_restore() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 10, None);

        state.new_checkpoint();
        let _ = state.add_propagator(
            StepwiseLowerBound {
                x,
                target: 2,
                calls: 0,
            },
            false,
        );
        state.propagate_to_fixed_point().unwrap();
        state.restore_to(0);
        assert_eq!(state.lower_bound(&x), 0);

        state.propagate_to_fixed_point().unwrap();

        assert_eq!(state.lower_bound(&x), 2);
        assert_eq!(state.num_propagators(), 1);
    }
}

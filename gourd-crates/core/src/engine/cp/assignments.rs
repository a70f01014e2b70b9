use enumset::EnumSet;

use super::delta::DeltaMonitor;
use super::delta::DomainDelta;
use super::integer_domain::IntegerDomain;
use crate::basic_types::EmptyDomain;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::engine::environment::Environment;
use crate::engine::environment::EnvironmentKind;
use crate::engine::environment::ReversibleStore;
use crate::engine::environment::StoredInteger;
use crate::engine::notifications::DomainEvent;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateType;
use crate::engine::variables::DomainId;
use crate::gourd_assert_simple;

/// The domains of all variables of a solver, stored in a reversible [`Environment`].
///
/// Every successful mutation queues the resulting [`DomainEvent`]s (drained by the engine to
/// wake propagators) and, if some propagator monitors the domain, records the removed values in
/// its delta.
#[derive(Debug, Clone)]
pub struct Assignments {
    environment: Environment,
    domains: KeyedVec<DomainId, IntegerDomain>,
    names: KeyedVec<DomainId, Option<String>>,
    pending_events: Vec<(DomainId, DomainEvent)>,
    deltas: KeyedVec<DomainId, Option<DomainDelta>>,
    delta_cycle: u64,
}

impl Default for Assignments {
    fn default() -> Self {
        Assignments::new(EnvironmentKind::default())
    }
}

impl Assignments {
    pub(crate) fn new(kind: EnvironmentKind) -> Self {
        Assignments {
            environment: Environment::new(kind),
            domains: KeyedVec::default(),
            names: KeyedVec::default(),
            pending_events: Vec::new(),
            deltas: KeyedVec::default(),
            delta_cycle: 0,
        }
    }

    pub(crate) fn environment_kind(&self) -> EnvironmentKind {
        self.environment.kind()
    }

    pub(crate) fn num_domains(&self) -> u32 {
        self.domains.len() as u32
    }

    pub(crate) fn get_domains(&self) -> impl Iterator<Item = DomainId> {
        (0..self.domains.len()).map(DomainId::create_from_index)
    }

    pub(crate) fn get_name(&self, domain_id: DomainId) -> Option<&str> {
        self.names[domain_id].as_deref()
    }

    /// Creates a domain with the interval `[lower_bound, upper_bound]` which only tracks its
    /// bounds.
    pub(crate) fn grow(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<String>,
    ) -> DomainId {
        let domain = IntegerDomain::bounded(&mut self.environment, lower_bound, upper_bound);
        self.push_domain(domain, name)
    }

    /// Creates a domain which can represent holes, initially containing exactly `values`.
    pub(crate) fn grow_enumerated(
        &mut self,
        mut values: Vec<i32>,
        name: Option<String>,
    ) -> DomainId {
        gourd_assert_simple!(!values.is_empty(), "cannot create a variable with an empty domain");

        values.sort_unstable();
        values.dedup();

        let domain = IntegerDomain::enumerated(&mut self.environment, &values);
        self.push_domain(domain, name)
    }

    fn push_domain(&mut self, domain: IntegerDomain, name: Option<String>) -> DomainId {
        let _ = self.names.push(name);
        let _ = self.deltas.push(None);
        self.domains.push(domain)
    }

    pub(crate) fn is_enumerated(&self, domain_id: DomainId) -> bool {
        self.domains[domain_id].is_enumerated()
    }
}

/// Reversible cells which are not part of a domain.
impl Assignments {
    pub(crate) fn new_stored_integer(&mut self, initial_value: i64) -> StoredInteger {
        self.environment.grow(initial_value)
    }

    pub(crate) fn read_stored(&self, cell: StoredInteger) -> i64 {
        self.environment.read(cell)
    }

    pub(crate) fn write_stored(&mut self, cell: StoredInteger, value: i64) {
        self.environment.assign(cell, value)
    }
}

/// Worlds.
impl Assignments {
    pub(crate) fn world_index(&self) -> usize {
        self.environment.world_index()
    }

    pub(crate) fn push_world(&mut self) {
        self.environment.push_world();
    }

    /// Restores every domain to its state in `world` and discards the pending events and deltas
    /// which belong to the abandoned worlds.
    pub(crate) fn pop_until(&mut self, world: usize) {
        self.environment.pop_until(world);
        self.pending_events.clear();
        self.advance_delta_cycle();
    }

    /// Starts a new propagation cycle; deltas recorded so far become invisible.
    pub(crate) fn advance_delta_cycle(&mut self) {
        self.delta_cycle += 1;
    }
}

/// Queries.
impl Assignments {
    pub(crate) fn get_lower_bound(&self, domain_id: DomainId) -> i32 {
        self.domains[domain_id].lower_bound(&self.environment)
    }

    pub(crate) fn get_upper_bound(&self, domain_id: DomainId) -> i32 {
        self.domains[domain_id].upper_bound(&self.environment)
    }

    pub(crate) fn get_domain_size(&self, domain_id: DomainId) -> u32 {
        self.domains[domain_id].size(&self.environment)
    }

    pub(crate) fn is_value_in_domain(&self, domain_id: DomainId, value: i32) -> bool {
        self.domains[domain_id].contains(&self.environment, value)
    }

    pub(crate) fn is_domain_assigned(&self, domain_id: DomainId) -> bool {
        self.get_lower_bound(domain_id) == self.get_upper_bound(domain_id)
    }

    pub(crate) fn get_next_value(&self, domain_id: DomainId, value: i32) -> Option<i32> {
        self.domains[domain_id].next_value(&self.environment, value)
    }

    pub(crate) fn get_previous_value(&self, domain_id: DomainId, value: i32) -> Option<i32> {
        self.domains[domain_id].previous_value(&self.environment, value)
    }

    /// Iterates over the values of the domain in increasing order.
    pub(crate) fn get_domain_iterator(&self, domain_id: DomainId) -> IntegerDomainIterator<'_> {
        IntegerDomainIterator {
            assignments: self,
            domain_id: Some(domain_id),
            next: Some(self.get_lower_bound(domain_id)),
        }
    }

    /// Returns `Some(true)` if the predicate holds for every value in the domain, `Some(false)`
    /// if it holds for none, and `None` otherwise.
    pub(crate) fn evaluate_predicate(&self, predicate: Predicate) -> Option<bool> {
        let domain_id = predicate.get_domain();
        let value = predicate.get_right_hand_side();
        let lower_bound = self.get_lower_bound(domain_id);
        let upper_bound = self.get_upper_bound(domain_id);

        match predicate.get_predicate_type() {
            PredicateType::LowerBound => {
                if lower_bound >= value {
                    Some(true)
                } else if upper_bound < value {
                    Some(false)
                } else {
                    None
                }
            }
            PredicateType::UpperBound => {
                if upper_bound <= value {
                    Some(true)
                } else if lower_bound > value {
                    Some(false)
                } else {
                    None
                }
            }
            PredicateType::Equal => {
                if !self.is_value_in_domain(domain_id, value) {
                    Some(false)
                } else if lower_bound == upper_bound {
                    Some(true)
                } else {
                    None
                }
            }
            PredicateType::NotEqual => {
                if !self.is_value_in_domain(domain_id, value) {
                    Some(true)
                } else if lower_bound == upper_bound {
                    Some(false)
                } else {
                    None
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    pub(crate) fn drain_pending_events(
        &mut self,
    ) -> impl Iterator<Item = (DomainId, DomainEvent)> + '_ {
        self.pending_events.drain(..)
    }

    pub(crate) fn clear_pending_events(&mut self) {
        self.pending_events.clear();
    }
}

/// Deltas.
impl Assignments {
    /// Starts recording removals for the domain, if that is not done already, and returns a
    /// fresh cursor.
    pub(crate) fn monitor_delta(&mut self, domain_id: DomainId) -> DeltaMonitor {
        let cycle = self.delta_cycle;
        let _ = self.deltas[domain_id].get_or_insert_with(|| DomainDelta::new(cycle));

        let mut monitor = DeltaMonitor::new(domain_id, cycle);
        monitor.cursor = self.deltas[domain_id]
            .as_ref()
            .map(|delta| delta.removed_since(cycle, 0).len())
            .unwrap_or_default();
        monitor
    }

    /// The intervals removed from the monitored domain since the monitor was last read in this
    /// propagation cycle.
    pub(crate) fn read_delta(&self, monitor: &mut DeltaMonitor) -> &[(i32, i32)] {
        if monitor.cycle != self.delta_cycle {
            monitor.cycle = self.delta_cycle;
            monitor.cursor = 0;
        }

        let Some(delta) = monitor
            .domain
            .and_then(|domain_id| self.deltas[domain_id].as_ref())
        else {
            return &[];
        };

        let fresh = delta.removed_since(self.delta_cycle, monitor.cursor);
        monitor.cursor += fresh.len();
        fresh
    }

    fn record_removal(&mut self, domain_id: DomainId, from: i32, to: i32) {
        if from > to {
            return;
        }

        if let Some(delta) = self.deltas[domain_id].as_mut() {
            delta.record(self.delta_cycle, from, to);
        }
    }

    fn queue_events(&mut self, domain_id: DomainId, events: EnumSet<DomainEvent>) {
        self.pending_events
            .extend(events.iter().map(|event| (domain_id, event)));
    }
}

/// Mutators. Each returns `Ok(true)` if the domain changed, `Ok(false)` if it already satisfied
/// the request, and [`EmptyDomain`] (leaving the domain untouched) if it would become empty.
impl Assignments {
    pub(crate) fn tighten_lower_bound(
        &mut self,
        domain_id: DomainId,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        let old_lower_bound = self.get_lower_bound(domain_id);

        let events = self.domains[domain_id].tighten_lower_bound(&mut self.environment, bound)?;
        if events.is_empty() {
            return Ok(false);
        }

        let new_lower_bound = self.get_lower_bound(domain_id);
        self.record_removal(domain_id, old_lower_bound, new_lower_bound - 1);
        self.queue_events(domain_id, events);

        Ok(true)
    }

    pub(crate) fn tighten_upper_bound(
        &mut self,
        domain_id: DomainId,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        let old_upper_bound = self.get_upper_bound(domain_id);

        let events = self.domains[domain_id].tighten_upper_bound(&mut self.environment, bound)?;
        if events.is_empty() {
            return Ok(false);
        }

        let new_upper_bound = self.get_upper_bound(domain_id);
        self.record_removal(domain_id, new_upper_bound + 1, old_upper_bound);
        self.queue_events(domain_id, events);

        Ok(true)
    }

    pub(crate) fn remove_interval_from_domain(
        &mut self,
        domain_id: DomainId,
        from: i32,
        to: i32,
    ) -> Result<bool, EmptyDomain> {
        let old_lower_bound = self.get_lower_bound(domain_id);
        let old_upper_bound = self.get_upper_bound(domain_id);

        let events =
            self.domains[domain_id].remove_interval(&mut self.environment, from, to)?;
        if events.is_empty() {
            return Ok(false);
        }

        let new_lower_bound = self.get_lower_bound(domain_id);
        let new_upper_bound = self.get_upper_bound(domain_id);
        if events.contains(DomainEvent::LowerBound) {
            self.record_removal(domain_id, old_lower_bound, new_lower_bound - 1);
        } else if events.contains(DomainEvent::UpperBound) {
            self.record_removal(domain_id, new_upper_bound + 1, old_upper_bound);
        } else {
            self.record_removal(domain_id, from, to);
        }
        self.queue_events(domain_id, events);

        Ok(true)
    }

    pub(crate) fn remove_value_from_domain(
        &mut self,
        domain_id: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        self.remove_interval_from_domain(domain_id, value, value)
    }

    pub(crate) fn make_assignment(
        &mut self,
        domain_id: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let old_lower_bound = self.get_lower_bound(domain_id);
        let old_upper_bound = self.get_upper_bound(domain_id);

        let events = self.domains[domain_id].instantiate(&mut self.environment, value)?;
        if events.is_empty() {
            return Ok(false);
        }

        self.record_removal(domain_id, old_lower_bound, value - 1);
        self.record_removal(domain_id, value + 1, old_upper_bound);
        self.queue_events(domain_id, events);

        Ok(true)
    }

    /// Applies the predicate to its domain.
    pub(crate) fn post_predicate(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        let domain_id = predicate.get_domain();
        let value = predicate.get_right_hand_side();

        match predicate.get_predicate_type() {
            PredicateType::LowerBound => self.tighten_lower_bound(domain_id, value),
            PredicateType::UpperBound => self.tighten_upper_bound(domain_id, value),
            PredicateType::NotEqual => self.remove_value_from_domain(domain_id, value),
            PredicateType::Equal => self.make_assignment(domain_id, value),
        }
    }
}

/// Iterates over the values of a domain in increasing order.
#[derive(Debug, Clone)]
pub struct IntegerDomainIterator<'a> {
    assignments: &'a Assignments,
    domain_id: Option<DomainId>,
    next: Option<i32>,
}

impl<'a> IntegerDomainIterator<'a> {
    /// An iterator over the single value of a constant.
    pub(crate) fn single(assignments: &'a Assignments, value: i32) -> Self {
        IntegerDomainIterator {
            assignments,
            domain_id: None,
            next: Some(value),
        }
    }
}

impl Iterator for IntegerDomainIterator<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        let current = self.next?;
        self.next = self
            .domain_id
            .and_then(|domain_id| self.assignments.get_next_value(domain_id, current));
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate;

    #[test]
    fn mutations_queue_events() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 5, None);

        let changed = assignments.tighten_lower_bound(x, 5).unwrap();
        let events = assignments.drain_pending_events().collect::<Vec<_>>();

        assert!(changed);
        assert!(events.contains(&(x, DomainEvent::LowerBound)));
        assert!(events.contains(&(x, DomainEvent::Assign)));
        assert!(!assignments.has_pending_events());
    }

    #[test]
    fn noop_mutations_report_unchanged() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_enumerated(vec![1, 3, 5], None);

        assert!(!assignments.tighten_lower_bound(x, 0).unwrap());
        assert!(!assignments.remove_value_from_domain(x, 2).unwrap());
        assert!(!assignments.has_pending_events());
    }

    #[test]
    fn failed_mutation_leaves_the_domain_untouched() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 5, None);

        assert_eq!(assignments.make_assignment(x, 6), Err(EmptyDomain));
        assert_eq!(assignments.get_lower_bound(x), 0);
        assert_eq!(assignments.get_upper_bound(x), 5);
        assert!(!assignments.has_pending_events());
    }

    #[test]
    fn removing_a_bound_moves_the_bound() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_enumerated(vec![1, 2, 4], None);

        let _ = assignments.remove_value_from_domain(x, 4).unwrap();

        assert_eq!(assignments.get_upper_bound(x), 2);
        assert_eq!(assignments.get_domain_size(x), 2);
    }

    #[test]
    fn deltas_are_only_visible_within_their_cycle() {
        let mut assignments = Assignments::default();
        let x = assignments.grow_enumerated(vec![1, 2, 3, 4, 5], None);
        let mut monitor = assignments.monitor_delta(x);

        let _ = assignments.remove_value_from_domain(x, 3).unwrap();
        let _ = assignments.tighten_upper_bound(x, 4).unwrap();
        assert_eq!(assignments.read_delta(&mut monitor), &[(3, 3), (5, 5)]);
        assert!(assignments.read_delta(&mut monitor).is_empty());

        let _ = assignments.remove_value_from_domain(x, 2).unwrap();
        assignments.advance_delta_cycle();
        assert!(assignments.read_delta(&mut monitor).is_empty());

        let _ = assignments.make_assignment(x, 4).unwrap();
        assert_eq!(assignments.read_delta(&mut monitor), &[(1, 3)]);
    }

    #[test]
    fn popping_a_world_restores_domains() {
        for kind in [EnvironmentKind::Trailing, EnvironmentKind::Copying] {
            let mut assignments = Assignments::new(kind);
            let x = assignments.grow_enumerated(vec![0, 1, 2, 3, 4, 5, 6], None);
            let _ = assignments.remove_value_from_domain(x, 3).unwrap();

            assignments.push_world();
            let _ = assignments.tighten_lower_bound(x, 2).unwrap();
            let _ = assignments.remove_value_from_domain(x, 5).unwrap();
            let _ = assignments.make_assignment(x, 4).unwrap();
            assignments.pop_until(0);

            assert_eq!(
                assignments.get_domain_iterator(x).collect::<Vec<_>>(),
                vec![0, 1, 2, 4, 5, 6]
            );
            assert_eq!(assignments.get_domain_size(x), 6);
            assert!(!assignments.has_pending_events());
        }
    }

    #[test]
    fn predicates_are_evaluated_against_the_domain() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(2, 6, None);

        assert_eq!(assignments.evaluate_predicate(predicate!(x >= 2)), Some(true));
        assert_eq!(assignments.evaluate_predicate(predicate!(x <= 1)), Some(false));
        assert_eq!(assignments.evaluate_predicate(predicate!(x == 4)), None);
        assert_eq!(assignments.evaluate_predicate(predicate!(x != 9)), Some(true));

        let _ = assignments.post_predicate(predicate!(x == 4)).unwrap();
        assert_eq!(assignments.evaluate_predicate(predicate!(x == 4)), Some(true));
    }
}

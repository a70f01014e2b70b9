use enumset::EnumSet;

use super::IntegerVariable;
use crate::basic_types::EmptyDomain;
use crate::basic_types::Solution;
use crate::containers::StorageKey;
use crate::engine::cp::Assignments;
use crate::engine::cp::DeltaMonitor;
use crate::engine::cp::IntegerDomainIterator;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::Watchers;

/// An identifier of an integer domain stored in the solver.
#[derive(Clone, PartialEq, Eq, Copy, Hash, PartialOrd, Ord)]
pub struct DomainId {
    id: u32,
}

impl DomainId {
    pub(crate) const fn new(id: u32) -> Self {
        DomainId { id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl IntegerVariable for DomainId {
    fn lower_bound(&self, assignments: &Assignments) -> i32 {
        assignments.get_lower_bound(*self)
    }

    fn upper_bound(&self, assignments: &Assignments) -> i32 {
        assignments.get_upper_bound(*self)
    }

    fn contains(&self, assignments: &Assignments, value: i32) -> bool {
        assignments.is_value_in_domain(*self, value)
    }

    fn size(&self, assignments: &Assignments) -> u32 {
        assignments.get_domain_size(*self)
    }

    fn next_value(&self, assignments: &Assignments, value: i32) -> Option<i32> {
        assignments.get_next_value(*self, value)
    }

    fn previous_value(&self, assignments: &Assignments, value: i32) -> Option<i32> {
        assignments.get_previous_value(*self, value)
    }

    fn iterate_domain<'a>(&self, assignments: &'a Assignments) -> IntegerDomainIterator<'a> {
        assignments.get_domain_iterator(*self)
    }

    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>) {
        watchers.watch_all(*self, events);
    }

    fn monitor_delta(&self, assignments: &mut Assignments) -> DeltaMonitor {
        assignments.monitor_delta(*self)
    }

    fn remove_value(&self, assignments: &mut Assignments, value: i32) -> Result<bool, EmptyDomain> {
        assignments.remove_value_from_domain(*self, value)
    }

    fn remove_interval(
        &self,
        assignments: &mut Assignments,
        from: i32,
        to: i32,
    ) -> Result<bool, EmptyDomain> {
        assignments.remove_interval_from_domain(*self, from, to)
    }

    fn update_lower_bound(
        &self,
        assignments: &mut Assignments,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        assignments.tighten_lower_bound(*self, bound)
    }

    fn update_upper_bound(
        &self,
        assignments: &mut Assignments,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        assignments.tighten_upper_bound(*self, bound)
    }

    fn instantiate_to(
        &self,
        assignments: &mut Assignments,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        assignments.make_assignment(*self, value)
    }

    fn value_in(&self, solution: &Solution) -> i32 {
        solution.get_value(*self)
    }
}

impl StorageKey for DomainId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        DomainId { id: index as u32 }
    }
}

impl std::fmt::Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

impl std::fmt::Debug for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

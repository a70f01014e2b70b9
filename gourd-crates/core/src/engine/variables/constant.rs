use enumset::EnumSet;

use super::IntegerVariable;
use crate::basic_types::EmptyDomain;
use crate::basic_types::Solution;
use crate::engine::cp::Assignments;
use crate::engine::cp::DeltaMonitor;
use crate::engine::cp::IntegerDomainIterator;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::Watchers;

/// A constant never changes: its mutators either do nothing or fail, and it never schedules a
/// propagator.
impl IntegerVariable for i32 {
    fn lower_bound(&self, _assignments: &Assignments) -> i32 {
        *self
    }

    fn upper_bound(&self, _assignments: &Assignments) -> i32 {
        *self
    }

    fn contains(&self, _assignments: &Assignments, value: i32) -> bool {
        value == *self
    }

    fn size(&self, _assignments: &Assignments) -> u32 {
        1
    }

    fn next_value(&self, _assignments: &Assignments, value: i32) -> Option<i32> {
        (value < *self).then_some(*self)
    }

    fn previous_value(&self, _assignments: &Assignments, value: i32) -> Option<i32> {
        (value > *self).then_some(*self)
    }

    fn iterate_domain<'a>(&self, assignments: &'a Assignments) -> IntegerDomainIterator<'a> {
        IntegerDomainIterator::single(assignments, *self)
    }

    fn watch_all(&self, _watchers: &mut Watchers<'_>, _events: EnumSet<DomainEvent>) {}

    fn monitor_delta(&self, _assignments: &mut Assignments) -> DeltaMonitor {
        DeltaMonitor::detached()
    }

    fn remove_value(
        &self,
        _assignments: &mut Assignments,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        if value == *self {
            Err(EmptyDomain)
        } else {
            Ok(false)
        }
    }

    fn remove_interval(
        &self,
        _assignments: &mut Assignments,
        from: i32,
        to: i32,
    ) -> Result<bool, EmptyDomain> {
        if (from..=to).contains(self) {
            Err(EmptyDomain)
        } else {
            Ok(false)
        }
    }

    fn update_lower_bound(
        &self,
        _assignments: &mut Assignments,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        if bound > *self {
            Err(EmptyDomain)
        } else {
            Ok(false)
        }
    }

    fn update_upper_bound(
        &self,
        _assignments: &mut Assignments,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        if bound < *self {
            Err(EmptyDomain)
        } else {
            Ok(false)
        }
    }

    fn instantiate_to(
        &self,
        _assignments: &mut Assignments,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        if value == *self {
            Ok(false)
        } else {
            Err(EmptyDomain)
        }
    }

    fn value_in(&self, _solution: &Solution) -> i32 {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_mutators_only_fail_or_do_nothing() {
        let mut assignments = Assignments::default();
        let constant = 5;

        assert_eq!(constant.remove_value(&mut assignments, 4), Ok(false));
        assert_eq!(constant.remove_value(&mut assignments, 5), Err(EmptyDomain));
        assert_eq!(constant.update_lower_bound(&mut assignments, 5), Ok(false));
        assert_eq!(constant.update_lower_bound(&mut assignments, 6), Err(EmptyDomain));
        assert_eq!(constant.update_upper_bound(&mut assignments, 4), Err(EmptyDomain));
        assert_eq!(constant.instantiate_to(&mut assignments, 5), Ok(false));
        assert_eq!(constant.remove_interval(&mut assignments, 0, 4), Ok(false));
        assert_eq!(constant.remove_interval(&mut assignments, 0, 5), Err(EmptyDomain));

        assert!(!assignments.has_pending_events());
    }

    #[test]
    fn constant_domain_queries() {
        let assignments = Assignments::default();
        let constant = -3;

        assert!(constant.is_fixed(&assignments));
        assert_eq!(constant.next_value(&assignments, -10), Some(-3));
        assert_eq!(constant.next_value(&assignments, -3), None);
        assert_eq!(constant.previous_value(&assignments, 0), Some(-3));
        assert_eq!(
            constant.iterate_domain(&assignments).collect::<Vec<_>>(),
            vec![-3]
        );
    }
}

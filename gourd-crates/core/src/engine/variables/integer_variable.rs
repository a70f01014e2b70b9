use enumset::EnumSet;

use crate::basic_types::EmptyDomain;
use crate::basic_types::Solution;
use crate::engine::cp::Assignments;
use crate::engine::cp::DeltaMonitor;
use crate::engine::cp::IntegerDomainIterator;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::Watchers;

/// A trait specifying the behaviour of an integer variable: reading its domain, subscribing to
/// its events and reducing its domain.
///
/// Every mutator returns `Ok(true)` when the domain changed, `Ok(false)` when the domain already
/// excluded the requested values, and [`EmptyDomain`] when the mutation would leave no value; in
/// the last case the domain is left untouched.
pub trait IntegerVariable: Clone + std::fmt::Debug + 'static {
    /// Get the lower bound of the variable.
    fn lower_bound(&self, assignments: &Assignments) -> i32;

    /// Get the upper bound of the variable.
    fn upper_bound(&self, assignments: &Assignments) -> i32;

    /// Determine whether the value is in the domain of this variable.
    fn contains(&self, assignments: &Assignments, value: i32) -> bool;

    /// The number of values in the domain.
    fn size(&self, assignments: &Assignments) -> u32;

    fn is_fixed(&self, assignments: &Assignments) -> bool {
        self.lower_bound(assignments) == self.upper_bound(assignments)
    }

    /// The smallest value in the domain which is strictly larger than `value`.
    fn next_value(&self, assignments: &Assignments, value: i32) -> Option<i32>;

    /// The largest value in the domain which is strictly smaller than `value`.
    fn previous_value(&self, assignments: &Assignments, value: i32) -> Option<i32>;

    /// Iterate over the values of the domain in increasing order.
    fn iterate_domain<'a>(&self, assignments: &'a Assignments) -> IntegerDomainIterator<'a>;

    /// Register a watch for this variable on the given domain events.
    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>);

    /// Start recording the values removed from this variable.
    fn monitor_delta(&self, assignments: &mut Assignments) -> DeltaMonitor;

    fn remove_value(&self, assignments: &mut Assignments, value: i32) -> Result<bool, EmptyDomain>;

    /// Removes every value in `[from, to]`.
    fn remove_interval(
        &self,
        assignments: &mut Assignments,
        from: i32,
        to: i32,
    ) -> Result<bool, EmptyDomain>;

    fn update_lower_bound(
        &self,
        assignments: &mut Assignments,
        bound: i32,
    ) -> Result<bool, EmptyDomain>;

    fn update_upper_bound(
        &self,
        assignments: &mut Assignments,
        bound: i32,
    ) -> Result<bool, EmptyDomain>;

    fn instantiate_to(
        &self,
        assignments: &mut Assignments,
        value: i32,
    ) -> Result<bool, EmptyDomain>;

    /// The value this variable takes in the given solution.
    fn value_in(&self, solution: &Solution) -> i32;
}

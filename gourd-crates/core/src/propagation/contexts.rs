use crate::basic_types::EmptyDomain;
use crate::engine::cp::Assignments;
use crate::engine::cp::DeltaMonitor;
use crate::engine::cp::IntegerDomainIterator;
use crate::engine::environment::StoredInteger;
use crate::engine::predicates::Predicate;
use crate::engine::variables::IntegerVariable;
use crate::propagation::PropagatorId;

/// Gives access to the [`Assignments`] behind a context.
pub trait HasAssignments {
    fn assignments(&self) -> &Assignments;
}

/// Read access to the domains of variables. Implemented by every context handed to a
/// propagator.
pub trait ReadDomains {
    fn lower_bound<Var: IntegerVariable>(&self, var: &Var) -> i32;

    fn upper_bound<Var: IntegerVariable>(&self, var: &Var) -> i32;

    fn contains<Var: IntegerVariable>(&self, var: &Var, value: i32) -> bool;

    fn size<Var: IntegerVariable>(&self, var: &Var) -> u32;

    fn is_fixed<Var: IntegerVariable>(&self, var: &Var) -> bool {
        self.lower_bound(var) == self.upper_bound(var)
    }

    /// The value of the variable if its domain is a singleton.
    fn fixed_value<Var: IntegerVariable>(&self, var: &Var) -> Option<i32> {
        self.is_fixed(var).then(|| self.lower_bound(var))
    }

    fn iterate_domain<Var: IntegerVariable>(&self, var: &Var) -> IntegerDomainIterator<'_>;

    /// Whether the predicate holds for every, for no, or for some values of its domain.
    fn evaluate_predicate(&self, predicate: Predicate) -> Option<bool>;

    /// The index of the current world; `0` is the root.
    fn get_checkpoint(&self) -> usize;
}

impl<T: HasAssignments> ReadDomains for T {
    fn lower_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.lower_bound(self.assignments())
    }

    fn upper_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.upper_bound(self.assignments())
    }

    fn contains<Var: IntegerVariable>(&self, var: &Var, value: i32) -> bool {
        var.contains(self.assignments(), value)
    }

    fn size<Var: IntegerVariable>(&self, var: &Var) -> u32 {
        var.size(self.assignments())
    }

    fn iterate_domain<Var: IntegerVariable>(&self, var: &Var) -> IntegerDomainIterator<'_> {
        var.iterate_domain(self.assignments())
    }

    fn evaluate_predicate(&self, predicate: Predicate) -> Option<bool> {
        self.assignments().evaluate_predicate(predicate)
    }

    fn get_checkpoint(&self) -> usize {
        self.assignments().world_index()
    }
}

/// Read-only view on the domains, given to a propagator when it is notified, synchronised or
/// asked for entailment.
#[derive(Debug, Clone, Copy)]
pub struct PropagationContext<'a> {
    assignments: &'a Assignments,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(assignments: &'a Assignments) -> Self {
        PropagationContext { assignments }
    }
}

impl HasAssignments for PropagationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

/// Given to [`Propagator::propagate`]: reads domains and reduces them on behalf of one
/// propagator.
///
/// Every reduction returns `Ok(true)` if the domain changed and `Ok(false)` if it already
/// satisfied the request; [`EmptyDomain`] is the only way a reduction fails, and should be
/// propagated with `?`.
///
/// [`Propagator::propagate`]: crate::propagation::Propagator::propagate
#[derive(Debug)]
pub struct PropagationContextMut<'a> {
    assignments: &'a mut Assignments,
    propagator_id: PropagatorId,
    activity: StoredInteger,
}

impl<'a> PropagationContextMut<'a> {
    pub(crate) fn new(
        assignments: &'a mut Assignments,
        propagator_id: PropagatorId,
        activity: StoredInteger,
    ) -> Self {
        PropagationContextMut {
            assignments,
            propagator_id,
            activity,
        }
    }

    /// The id of the propagator which is being called.
    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// Shorten the context, for passing it to a helper while keeping it for later use.
    pub fn reborrow(&mut self) -> PropagationContextMut<'_> {
        PropagationContextMut {
            assignments: self.assignments,
            propagator_id: self.propagator_id,
            activity: self.activity,
        }
    }

    /// A read-only copy of this context.
    pub fn as_readonly(&self) -> PropagationContext<'_> {
        PropagationContext::new(self.assignments)
    }

    pub fn remove<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        var.remove_value(self.assignments, value)
    }

    /// Removes every value in `[from, to]` from the domain of `var`.
    pub fn remove_interval<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        from: i32,
        to: i32,
    ) -> Result<bool, EmptyDomain> {
        var.remove_interval(self.assignments, from, to)
    }

    pub fn set_lower_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        var.update_lower_bound(self.assignments, bound)
    }

    pub fn set_upper_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        bound: i32,
    ) -> Result<bool, EmptyDomain> {
        var.update_upper_bound(self.assignments, bound)
    }

    pub fn instantiate<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        var.instantiate_to(self.assignments, value)
    }

    /// Applies a [`Predicate`] to the domain of its variable.
    pub fn post(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        self.assignments.post_predicate(predicate)
    }

    /// The intervals removed from the monitored variable since the monitor was last read during
    /// the current propagation cycle.
    pub fn read_delta(&self, monitor: &mut DeltaMonitor) -> Vec<(i32, i32)> {
        self.assignments.read_delta(monitor).to_vec()
    }

    /// The propagator is not called again until the world in which this is called is popped.
    pub fn set_passive(&mut self) {
        self.assignments.write_stored(self.activity, 0);
    }
}

impl HasAssignments for PropagationContextMut<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

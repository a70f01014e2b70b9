use super::HasAssignments;
use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use super::PropagatorVarId;
#[cfg(doc)]
use crate::Solver;
use crate::engine::cp::Assignments;
use crate::engine::cp::DeltaMonitor;
use crate::engine::notifications::DomainEvents;
use crate::engine::notifications::Watchers;
use crate::engine::State;
use crate::engine::variables::IntegerVariable;

/// A propagator constructor creates a fully initialised instance of a [`Propagator`].
///
/// The constructor is responsible for indicating on which events the propagator should be
/// enqueued, and for starting the delta monitors the propagator consumes.
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator + Clone;

    /// Create the propagator instance from `Self`.
    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl;
}

/// [`PropagatorConstructorContext`] is used when [`Propagator`]s are initialised after creation.
///
/// It represents a communication point between the [`Solver`] and the [`Propagator`].
/// Propagators use it to register to domain changes of variables and to retrieve the current
/// bounds of variables.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    state: &'a mut State,
    propagator_id: PropagatorId,
}

impl PropagatorConstructorContext<'_> {
    pub(crate) fn new(
        propagator_id: PropagatorId,
        state: &mut State,
    ) -> PropagatorConstructorContext<'_> {
        PropagatorConstructorContext {
            state,
            propagator_id,
        }
    }

    /// Subscribes the propagator to the given [`DomainEvents`] of `var`.
    ///
    /// The [`LocalId`] is handed back in [`Propagator::notify`] to identify the variable. Each
    /// variable *must* have a unique [`LocalId`]; most often this is the index of the variable
    /// in the internal array of variables.
    pub fn register<Var: IntegerVariable>(
        &mut self,
        var: Var,
        domain_events: DomainEvents,
        local_id: LocalId,
    ) {
        let propagator_var = PropagatorVarId {
            propagator: self.propagator_id,
            variable: local_id,
        };

        let (watch_list, watched_domains) = self.state.watch_registration(self.propagator_id);
        let mut watchers = Watchers::new(propagator_var, watch_list, watched_domains);
        var.watch_all(&mut watchers, domain_events.get_int_events());
    }

    /// Starts recording the values removed from `var`, to be read with
    /// [`crate::propagation::PropagationContextMut::read_delta`].
    pub fn monitor_delta<Var: IntegerVariable>(&mut self, var: &Var) -> DeltaMonitor {
        var.monitor_delta(&mut self.state.assignments)
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }
}

impl HasAssignments for PropagatorConstructorContext<'_> {
    fn assignments(&self) -> &Assignments {
        &self.state.assignments
    }
}

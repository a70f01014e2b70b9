use downcast_rs::impl_downcast;
use downcast_rs::Downcast;
use dyn_clone::clone_trait_object;
use dyn_clone::DynClone;

use super::LocalId;
use super::PropagationContext;
use super::PropagationContextMut;
use crate::basic_types::PropagationStatusCP;
#[cfg(doc)]
use crate::create_statistics_struct;
use crate::engine::notifications::DomainEvent;
#[cfg(doc)]
use crate::options::NonIdempotencePolicy;
#[cfg(doc)]
use crate::propagation::PropagatorConstructorContext;
use crate::statistics::StatisticLogger;

// Allows retrieving the concrete propagator behind a `PropagatorHandle`.
impl_downcast!(Propagator);

// Allows cloning a `State`.
clone_trait_object!(Propagator);

/// A propagator removes values from domains which will never be in any solution, or raises
/// explicit conflicts.
///
/// The only required functions are [`Propagator::name`] and [`Propagator::propagate`]; all other
/// functions have default implementations.
pub trait Propagator: Downcast + DynClone {
    /// Return the name of the propagator, used when logging.
    fn name(&self) -> &str;

    /// Returns the [`Priority`] of the propagator, used for determining the order in which
    /// propagators are called.
    ///
    /// By default the priority is set to [`Priority::VeryLow`].
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// Removes values which cannot be part of any solution given the current domains, or
    /// reports a conflict.
    ///
    /// A conflict is either a [`crate::basic_types::EmptyDomain`] coming out of one of the
    /// domain operations of the context (propagated with `?`), or a
    /// [`crate::basic_types::PropagatorConflict`] when the propagator detects the
    /// inconsistency itself.
    ///
    /// Propagators are not required to reach a fixed point in one call, unless they report
    /// themselves as idempotent through [`Propagator::is_idempotent`].
    fn propagate(&mut self, context: PropagationContextMut) -> PropagationStatusCP;

    /// Called instead of [`Propagator::propagate`] on the first call after posting and on the
    /// first call after a restore which invalidated the incremental state of the propagator.
    ///
    /// By default this function calls [`Propagator::propagate`].
    fn propagate_from_scratch(&mut self, context: PropagationContextMut) -> PropagationStatusCP {
        self.propagate(context)
    }

    /// Called when a [`DomainEvent`] happens to one of the variables the propagator registered
    /// (with [`PropagatorConstructorContext::register`]); decides whether the propagator should
    /// be enqueued.
    ///
    /// Only cheap bookkeeping belongs here; expensive work belongs in [`Propagator::propagate`].
    fn notify(
        &mut self,
        _context: PropagationContext,
        _local_id: LocalId,
        _event: DomainEvent,
    ) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// Called after backtracking, allowing the propagator to update its internal data structures
    /// given the new variable domains.
    fn synchronise(&mut self, _context: PropagationContext) {}

    /// Whether the propagator can still remove values, judged on the current domains.
    fn is_entailed(&self, _context: PropagationContext) -> Entailment {
        Entailment::Undecided
    }

    /// An idempotent propagator is at a fixed point after every successful call, so it is never
    /// woken up by its own domain changes. Other propagators are handled according to the
    /// [`NonIdempotencePolicy`] of the solver.
    fn is_idempotent(&self) -> bool {
        true
    }

    /// Logs statistics of the propagator using the provided [`StatisticLogger`].
    ///
    /// It is recommended to create a struct through the [`create_statistics_struct!`] macro!
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// Indicator of what to do when a propagator is notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    /// The propagator should be enqueued.
    Enqueue,
    /// The propagator should not be enqueued.
    Skip,
}

/// The outcome of [`Propagator::is_entailed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entailment {
    /// Every assignment of the current domains satisfies the propagator.
    Entailed,
    /// No assignment of the current domains satisfies the propagator.
    Disentailed,
    Undecided,
}

/// The priority of a propagator, used for determining the order in which propagators will be
/// called.
///
/// Propagators with high priority are propagated before propagators with low(er) priority.
/// Propagators with the same priority are called in the order in which they were enqueued.
///
/// Typically, propagators with low computational complexity should be assigned a high
/// priority.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    VeryLow = 3,
}

impl Priority {
    pub(crate) const NUM_LEVELS: u32 = 4;
}

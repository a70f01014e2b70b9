//! A [`TerminationCondition`] is polled by the search once per node. It indicates when the
//! search should give up, even though no definitive conclusion has been reached; the result is
//! then reported as unknown rather than unsatisfiable.

pub(crate) mod budgets;
pub(crate) mod combinator;
pub(crate) mod indefinite;
pub(crate) mod stop_flag;
pub(crate) mod time_budget;

/// Decides when the search should stop.
///
/// Besides [`TerminationCondition::should_stop`], the search reports the events which budgets
/// are commonly expressed in.
pub trait TerminationCondition {
    /// Returns `true` when the search should stop, `false` otherwise.
    fn should_stop(&mut self) -> bool;

    fn decision_has_been_made(&mut self) {}

    fn solution_has_been_found(&mut self) {}

    fn failure_has_occurred(&mut self) {}
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        self.as_mut().is_some_and(TerminationCondition::should_stop)
    }

    fn decision_has_been_made(&mut self) {
        if let Some(condition) = self {
            condition.decision_has_been_made();
        }
    }

    fn solution_has_been_found(&mut self) {
        if let Some(condition) = self {
            condition.solution_has_been_found();
        }
    }

    fn failure_has_occurred(&mut self) {
        if let Some(condition) = self {
            condition.failure_has_occurred();
        }
    }
}

impl<T: TerminationCondition + ?Sized> TerminationCondition for &mut T {
    fn should_stop(&mut self) -> bool {
        (**self).should_stop()
    }

    fn decision_has_been_made(&mut self) {
        (**self).decision_has_been_made();
    }

    fn solution_has_been_found(&mut self) {
        (**self).solution_has_been_found();
    }

    fn failure_has_occurred(&mut self) {
        (**self).failure_has_occurred();
    }
}

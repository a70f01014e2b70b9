use super::TerminationCondition;

/// A [`TerminationCondition`] which triggers when either of two conditions triggers. Every
/// search event is forwarded to both.
#[derive(Clone, Copy, Debug)]
pub struct Combinator<T1, T2> {
    first: T1,
    second: T2,
}

impl<T1, T2> Combinator<T1, T2> {
    /// Combine two [`TerminationCondition`]s into one.
    pub fn new(first: T1, second: T2) -> Self {
        Combinator { first, second }
    }
}

impl<T1: TerminationCondition, T2: TerminationCondition> TerminationCondition
    for Combinator<T1, T2>
{
    fn should_stop(&mut self) -> bool {
        // Both are polled so that neither misses a poll.
        let first = self.first.should_stop();
        let second = self.second.should_stop();
        first || second
    }

    fn decision_has_been_made(&mut self) {
        self.first.decision_has_been_made();
        self.second.decision_has_been_made();
    }

    fn solution_has_been_found(&mut self) {
        self.first.solution_has_been_found();
        self.second.solution_has_been_found();
    }

    fn failure_has_occurred(&mut self) {
        self.first.failure_has_occurred();
        self.second.failure_has_occurred();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::termination::budgets::DecisionBudget;
    use crate::engine::termination::budgets::SolutionBudget;

    #[test]
    fn triggers_when_either_condition_triggers() {
        let mut combined = Combinator::new(DecisionBudget::new(10), SolutionBudget::new(1));
        combined.decision_has_been_made();
        assert!(!combined.should_stop());

        combined.solution_has_been_found();
        assert!(combined.should_stop());
    }
}

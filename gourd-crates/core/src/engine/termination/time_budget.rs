use std::time::Duration;
use std::time::Instant;

use super::TerminationCondition;

/// A [`TerminationCondition`] which triggers when the specified time budget has been exceeded.
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    /// The point in time from which to measure the budget.
    started_at: Instant,
    budget: Duration,
}

impl TimeBudget {
    /// Give the search a time budget, starting now.
    pub fn starting_now(budget: Duration) -> TimeBudget {
        TimeBudget {
            started_at: Instant::now(),
            budget,
        }
    }
}

impl TerminationCondition for TimeBudget {
    fn should_stop(&mut self) -> bool {
        self.started_at.elapsed() >= self.budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_budget_is_exhausted_immediately() {
        let mut budget = TimeBudget::starting_now(Duration::ZERO);
        assert!(budget.should_stop());
    }

    #[test]
    fn large_budget_is_not_exhausted() {
        let mut budget = TimeBudget::starting_now(Duration::from_secs(3600));
        assert!(!budget.should_stop());
    }
}

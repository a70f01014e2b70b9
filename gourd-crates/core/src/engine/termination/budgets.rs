//! Budgets on the number of search events.
use super::TerminationCondition;

/// Stops the search once the given number of decisions (search nodes) has been made.
#[derive(Debug, Copy, Clone)]
pub struct DecisionBudget {
    budget: u64,
    num_decisions: u64,
}

impl DecisionBudget {
    pub fn new(budget: u64) -> Self {
        DecisionBudget {
            budget,
            num_decisions: 0,
        }
    }
}

impl TerminationCondition for DecisionBudget {
    fn should_stop(&mut self) -> bool {
        self.num_decisions >= self.budget
    }

    fn decision_has_been_made(&mut self) {
        self.num_decisions += 1;
    }
}

/// Stops the search once the given number of solutions has been found.
#[derive(Debug, Copy, Clone)]
pub struct SolutionBudget {
    budget: u64,
    num_solutions: u64,
}

impl SolutionBudget {
    pub fn new(budget: u64) -> Self {
        SolutionBudget {
            budget,
            num_solutions: 0,
        }
    }
}

impl TerminationCondition for SolutionBudget {
    fn should_stop(&mut self) -> bool {
        self.num_solutions >= self.budget
    }

    fn solution_has_been_found(&mut self) {
        self.num_solutions += 1;
    }
}

/// Stops the search once the given number of failed nodes has been encountered.
#[derive(Debug, Copy, Clone)]
pub struct FailureBudget {
    budget: u64,
    num_failures: u64,
}

impl FailureBudget {
    pub fn new(budget: u64) -> Self {
        FailureBudget {
            budget,
            num_failures: 0,
        }
    }
}

impl TerminationCondition for FailureBudget {
    fn should_stop(&mut self) -> bool {
        self.num_failures >= self.budget
    }

    fn failure_has_occurred(&mut self) {
        self.num_failures += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_budget_counts_decisions_only() {
        let mut budget = DecisionBudget::new(2);
        budget.solution_has_been_found();
        budget.failure_has_occurred();
        budget.decision_has_been_made();
        assert!(!budget.should_stop());

        budget.decision_has_been_made();
        assert!(budget.should_stop());
    }

    #[test]
    fn solution_budget_of_zero_stops_immediately() {
        let mut budget = SolutionBudget::new(0);
        assert!(budget.should_stop());
    }

    #[test]
    fn failure_budget_counts_failures() {
        let mut budget = FailureBudget::new(1);
        budget.decision_has_been_made();
        assert!(!budget.should_stop());

        budget.failure_has_occurred();
        assert!(budget.should_stop());
    }
}

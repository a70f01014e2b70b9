use crate::basic_types::Solution;
#[cfg(doc)]
use crate::termination::TerminationCondition;
#[cfg(doc)]
use crate::Solver;

/// The result of a call to [`Solver::satisfy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatisfactionResult {
    /// A solution was found.
    Satisfiable(Solution),
    /// The search space was exhausted without finding a solution.
    Unsatisfiable,
    /// It is not known whether a solution exists, because the [`TerminationCondition`]
    /// triggered.
    Unknown,
}

impl SatisfactionResult {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SatisfactionResult::Satisfiable(solution) => Some(solution),
            SatisfactionResult::Unsatisfiable | SatisfactionResult::Unknown => None,
        }
    }
}

/// The result of a call to [`Solver::optimise`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptimisationResult {
    /// An optimal solution has been found and proven to be optimal.
    Optimal(Solution),
    /// A solution was found, but the search stopped before proving it optimal. When merely
    /// satisfying, this is the first solution found.
    Satisfiable(Solution),
    /// There is no solution to the problem.
    Unsatisfiable,
    /// It is not known whether a solution exists, because the [`TerminationCondition`]
    /// triggered before one was found.
    Unknown,
}

impl OptimisationResult {
    /// The best solution found, whether or not it is proven optimal.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            OptimisationResult::Optimal(solution) | OptimisationResult::Satisfiable(solution) => {
                Some(solution)
            }
            OptimisationResult::Unsatisfiable | OptimisationResult::Unknown => None,
        }
    }

    /// Whether the search space has been explored completely.
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            OptimisationResult::Optimal(_) | OptimisationResult::Unsatisfiable
        )
    }
}

/// The result of a call to [`Solver::solutions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationResult {
    /// Every solution has been reported.
    Complete { num_solutions: u64 },
    /// The [`TerminationCondition`] triggered; more solutions may exist.
    Incomplete { num_solutions: u64 },
}

impl EnumerationResult {
    pub fn num_solutions(&self) -> u64 {
        match self {
            EnumerationResult::Complete { num_solutions }
            | EnumerationResult::Incomplete { num_solutions } => *num_solutions,
        }
    }
}

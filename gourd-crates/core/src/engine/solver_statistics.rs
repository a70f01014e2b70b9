use super::state::EngineStatistics;
use crate::create_statistics_struct;

create_statistics_struct!(
    /// Counters of the search, updated once per node and solution.
    pub SolverStatistics {
        /// The number of decisions taken, i.e. the number of nodes explored.
        num_decisions: u64,
        /// The number of refutations applied after a failure or a solution.
        num_backtracks: u64,
        /// The number of nodes at which propagation reported a conflict.
        num_failures: u64,
        num_solutions: u64,
        /// The largest number of decisions on the stack at once.
        peak_depth: u64,
        /// The wall-clock time spent searching, in milliseconds.
        time_spent_in_search_ms: u64,
        /// The counters of the propagation engine.
        engine: EngineStatistics,
    }
);

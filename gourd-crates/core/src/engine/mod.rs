pub(crate) mod cp;
pub(crate) mod environment;
pub(crate) mod notifications;
pub(crate) mod predicates;
pub(crate) mod search;
mod solver_options;
mod solver_statistics;
mod state;
pub(crate) mod termination;
pub(crate) mod test_solver;
pub(crate) mod variables;

pub use solver_options::NonIdempotencePolicy;
pub use solver_options::SolverOptions;
pub use solver_statistics::SolverStatistics;
pub use state::EngineStatistics;
pub use state::State;

use thiserror::Error;

#[cfg(doc)]
use crate::Solver;

/// Errors related to adding constraints to, or changing worlds of, the [`Solver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConstraintOperationError {
    #[error("Adding the constraint made the root of the search tree infeasible")]
    InfeasiblePropagator,
    #[error("The solver is already in an infeasible state")]
    InfeasibleState,
    #[error("There is no pushed world to pop")]
    PoppedRootWorld,
}

/// Errors in the setup of a search, reported before any decision is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("An objective variable is required when minimising or maximising")]
    MissingObjective,
    #[error("A portfolio requires at least one worker")]
    EmptyPortfolio,
}

//! Contains structures related to optimisation.
//!
//! Optimisation is performed by branch-and-bound: every time the search finds a solution, the
//! [`ObjectiveManager`] records its objective value and the [`ObjectiveBound`] propagator
//! forces every subsequent solution to be strictly better.
use std::fmt::Display;

mod objective_bound;
mod objective_manager;
mod shared_bound;

pub(crate) use objective_bound::ObjectiveBound;
pub(crate) use objective_bound::ObjectiveBoundArgs;
pub use objective_manager::ObjectiveManager;
pub use shared_bound::SharedBound;

/// The direction of the optimisation, either maximising or minimising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OptimisationDirection {
    Minimise,
    Maximise,
}

impl OptimisationDirection {
    /// Whether `candidate` is strictly better than `incumbent`.
    pub fn is_improvement(self, candidate: i32, incumbent: i32) -> bool {
        match self {
            OptimisationDirection::Minimise => candidate < incumbent,
            OptimisationDirection::Maximise => candidate > incumbent,
        }
    }
}

impl Display for OptimisationDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimisationDirection::Minimise => write!(f, "minimise"),
            OptimisationDirection::Maximise => write!(f, "maximise"),
        }
    }
}

/// What a call to [`crate::Solver::optimise`] is after.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ResolutionPolicy {
    /// Any solution will do; no objective is involved.
    #[default]
    Satisfy,
    Minimise,
    Maximise,
}

impl ResolutionPolicy {
    pub fn direction(self) -> Option<OptimisationDirection> {
        match self {
            ResolutionPolicy::Satisfy => None,
            ResolutionPolicy::Minimise => Some(OptimisationDirection::Minimise),
            ResolutionPolicy::Maximise => Some(OptimisationDirection::Maximise),
        }
    }
}

impl From<OptimisationDirection> for ResolutionPolicy {
    fn from(direction: OptimisationDirection) -> Self {
        match direction {
            OptimisationDirection::Minimise => ResolutionPolicy::Minimise,
            OptimisationDirection::Maximise => ResolutionPolicy::Maximise,
        }
    }
}

impl Display for ResolutionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionPolicy::Satisfy => write!(f, "satisfy"),
            ResolutionPolicy::Minimise => write!(f, "minimise"),
            ResolutionPolicy::Maximise => write!(f, "maximise"),
        }
    }
}

use std::fmt::Display;

use crate::engine::environment::EnvironmentKind;
#[cfg(doc)]
use crate::propagation::Propagator;
#[cfg(doc)]
use crate::Solver;

/// Options which influence how a [`Solver`] propagates and backtracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverOptions {
    /// How the reversible state is restored on backtrack.
    pub environment: EnvironmentKind,
    /// What to do when a non-idempotent propagator changes domains it watches itself.
    pub non_idempotence: NonIdempotencePolicy,
    /// The seed of the random number generator used by randomised branching.
    pub random_seed: u64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            environment: EnvironmentKind::default(),
            non_idempotence: NonIdempotencePolicy::default(),
            random_seed: 42,
        }
    }
}

/// The treatment of a [`Propagator`] which reports that it is not idempotent
/// ([`Propagator::is_idempotent`]) and which triggers events on variables it watches itself.
///
/// Idempotent propagators are never woken up by their own events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum NonIdempotencePolicy {
    /// Enqueue the propagator again, like any other watcher.
    #[default]
    Ignore,
    /// Enqueue the propagator again and log a warning.
    Log,
    /// Do not enqueue the propagator on its own events, but call it once more when the queue
    /// runs empty.
    ExtraCall,
}

impl Display for NonIdempotencePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NonIdempotencePolicy::Ignore => write!(f, "ignore"),
            NonIdempotencePolicy::Log => write!(f, "log"),
            NonIdempotencePolicy::ExtraCall => write!(f, "extra-call"),
        }
    }
}

use thiserror::Error;

/// The result of invoking a propagator or of bringing the engine to a fixpoint.
pub type PropagationStatusCP = Result<(), Conflict>;

/// A contradiction: the current node of the search tree contains no solution.
///
/// It is raised either because a domain would become empty or because a propagator detected
/// an inconsistency directly. A [`Conflict`] never escapes the search loop; it is turned into
/// a backtrack there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Conflict {
    #[error(transparent)]
    EmptyDomain(#[from] EmptyDomain),
    #[error(transparent)]
    Propagator(#[from] PropagatorConflict),
}

/// A domain mutation would have removed the last value of a domain.
///
/// The mutation is not performed, so an empty domain is never observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a domain would become empty")]
pub struct EmptyDomain;

/// An inconsistency detected by a propagator without emptying a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{propagator} detected an inconsistency: {message}")]
pub struct PropagatorConflict {
    pub propagator: &'static str,
    pub message: &'static str,
}

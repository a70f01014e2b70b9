use log::warn;

use super::Constraint;
use super::ConstraintReference;
use crate::ConstraintOperationError;
use crate::Solver;

/// A temporary structure which is responsible for actually adding created constraints to the
/// solver. For an example on how to use this, see [`Solver::add_constraint`].
#[derive(Debug)]
pub struct ConstraintPoster<'solver> {
    solver: &'solver mut Solver,
    constraint: Option<Constraint>,
}

impl<'a> ConstraintPoster<'a> {
    pub(crate) fn new(solver: &'a mut Solver, constraint: Constraint) -> Self {
        ConstraintPoster {
            solver,
            constraint: Some(constraint),
        }
    }

    /// Add the constraint to the solver for the rest of the session.
    pub fn post(mut self) -> Result<ConstraintReference, ConstraintOperationError> {
        match self.constraint.take() {
            Some(constraint) => self.solver.post_constraint(constraint, false),
            None => Err(ConstraintOperationError::InfeasibleState),
        }
    }

    /// Add the constraint to the solver until the current world is popped with
    /// [`Solver::pop_world`].
    pub fn post_temporary(mut self) -> Result<ConstraintReference, ConstraintOperationError> {
        match self.constraint.take() {
            Some(constraint) => self.solver.post_constraint(constraint, true),
            None => Err(ConstraintOperationError::InfeasibleState),
        }
    }
}

impl Drop for ConstraintPoster<'_> {
    fn drop(&mut self) {
        if let Some(constraint) = &self.constraint {
            warn!(
                "The constraint '{}' is never posted, this is likely a mistake.",
                constraint.name()
            );
        }
    }
}

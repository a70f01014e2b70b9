//! Defines the constraints which can be added to the [`Solver`].
//!
//! A constraint is a relation over variables. In the solver, constraints are enforced through
//! propagators; a [`Constraint`] is a named conjunction of one or more propagators.
//!
//! # Example
//! ```
//! # use gourd_core::constraints;
//! # use gourd_core::Solver;
//! let mut solver = Solver::default();
//!
//! let a = solver.new_bounded_integer(0, 3);
//! let b = solver.new_bounded_integer(0, 3);
//!
//! let reference = solver
//!     .add_constraint(constraints::binary_not_equals(a, b))
//!     .post()
//!     .expect("the root is consistent");
//! assert_eq!(reference.name(), "binary_not_equals");
//! ```
mod all_different;
mod arithmetic;
mod constraint_poster;
mod unary;

use std::fmt::Debug;

pub use all_different::*;
pub use arithmetic::*;
pub use constraint_poster::*;
pub use unary::*;

use crate::engine::State;
use crate::propagation::Entailment;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorId;
#[cfg(doc)]
use crate::Solver;

/// A named relation over variables, enforced by the conjunction of its propagators.
///
/// Constraints are added with [`Solver::add_constraint`].
pub struct Constraint {
    name: String,
    propagators: Vec<Box<dyn AddPropagator>>,
}

impl Constraint {
    /// Creates a constraint without propagators.
    pub fn new(name: impl Into<String>) -> Self {
        Constraint {
            name: name.into(),
            propagators: Vec::new(),
        }
    }

    /// Adds a propagator to the conjunction.
    pub fn with_propagator<Constructor>(mut self, constructor: Constructor) -> Self
    where
        Constructor: PropagatorConstructor + 'static,
        Constructor::PropagatorImpl: 'static,
    {
        self.propagators.push(Box::new(constructor));
        self
    }

    /// Adds the propagators of `other` to the conjunction.
    pub fn merge(mut self, other: Constraint) -> Self {
        self.propagators.extend(other.propagators);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    /// Adds every propagator to the state, without propagating.
    pub(crate) fn add_to(self, state: &mut State, temporary: bool) -> ConstraintReference {
        let propagators = self
            .propagators
            .into_iter()
            .map(|propagator| propagator.add_to(state, temporary))
            .collect();

        ConstraintReference {
            name: self.name,
            propagators,
        }
    }
}

impl Debug for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constraint")
            .field("name", &self.name)
            .field("num_propagators", &self.propagators.len())
            .finish()
    }
}

/// Type-erased [`PropagatorConstructor`], so a [`Constraint`] can mix propagators.
trait AddPropagator {
    fn add_to(self: Box<Self>, state: &mut State, temporary: bool) -> PropagatorId;
}

impl<Constructor> AddPropagator for Constructor
where
    Constructor: PropagatorConstructor + 'static,
    Constructor::PropagatorImpl: 'static,
{
    fn add_to(self: Box<Self>, state: &mut State, temporary: bool) -> PropagatorId {
        state.add_propagator(*self, temporary).propagator_id()
    }
}

/// A handle to a posted [`Constraint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintReference {
    name: String,
    propagators: Box<[PropagatorId]>,
}

impl ConstraintReference {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn propagators(&self) -> &[PropagatorId] {
        &self.propagators
    }

    /// The status of the constraint on the current domains, or [`None`] if it was posted
    /// temporarily in a world which has since been popped.
    pub fn status(&self, state: &State) -> Option<ConstraintStatus> {
        let mut status = ConstraintStatus::Satisfied;

        for &propagator_id in self.propagators.iter() {
            match state.entailment(propagator_id)? {
                Entailment::Disentailed => return Some(ConstraintStatus::Violated),
                Entailment::Undecided => status = ConstraintStatus::Undetermined,
                Entailment::Entailed => {}
            }
        }

        Some(status)
    }
}

/// The status of a constraint, derived from the entailment of its propagators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintStatus {
    /// Every propagator is entailed.
    Satisfied,
    /// Some propagator is disentailed.
    Violated,
    Undetermined,
}

impl std::fmt::Display for ConstraintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintStatus::Satisfied => write!(f, "satisfied"),
            ConstraintStatus::Violated => write!(f, "violated"),
            ConstraintStatus::Undetermined => write!(f, "undetermined"),
        }
    }
}

//! # Gourd
//! The propagation and search core of a constraint programming solver over finite integer
//! domains.
//!
//! A problem is modelled by creating variables and adding [`constraints`] to a [`Solver`].
//! Each constraint is enforced by one or more [`propagation::Propagator`]s which remove
//! inconsistent values from the domains until a fixed point is reached. The solver explores
//! the remaining search space depth-first, guided by a [`branching::Brancher`], and restores
//! the domains on backtrack from a reversible environment (see [`options::EnvironmentKind`]).
//!
//! # Example
//! ```rust
//! # use gourd_core::constraints;
//! # use gourd_core::results::SatisfactionResult;
//! # use gourd_core::termination::Indefinite;
//! # use gourd_core::Solver;
//! let mut solver = Solver::default();
//!
//! let x = solver.new_enumerated_integer(1, 3);
//! let y = solver.new_enumerated_integer(1, 3);
//! let z = solver.new_enumerated_integer(1, 3);
//!
//! solver
//!     .add_constraint(constraints::all_different(vec![x, y, z]))
//!     .post()
//!     .expect("the root is consistent");
//! solver
//!     .add_constraint(constraints::not_equals(x, 1))
//!     .post()
//!     .expect("the root is consistent");
//!
//! let mut brancher = solver.default_brancher();
//! let SatisfactionResult::Satisfiable(solution) = solver.satisfy(&mut brancher, &mut Indefinite)
//! else {
//!     panic!("a permutation exists");
//! };
//!
//! assert_ne!(solution.get_value(x), 1);
//! assert_ne!(solution.get_value(x), solution.get_value(y));
//! assert_ne!(solution.get_value(y), solution.get_value(z));
//! ```
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod engine;
pub(crate) mod propagators;

#[doc(hidden)]
pub mod asserts;

pub mod branching;
pub mod constraints;
pub mod optimisation;
pub mod propagation;
pub mod statistics;

pub use rand;

// The api module is private but glob re-exported, so that its contents appear at the root of
// the crate (`gourd_core::results` rather than `gourd_core::api::results`).
mod api;

pub use api::*;

pub use crate::api::portfolio::Portfolio;
pub use crate::api::solver::DefaultBrancher;
pub use crate::api::solver::Solver;
pub use crate::basic_types::ConfigurationError;
pub use crate::basic_types::ConstraintOperationError;

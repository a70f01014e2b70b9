//! Contains structures and traits to define the decision making procedure of the [`Solver`].
//!
//! A [`Brancher`] is asked for a decision at every node of the search tree; the decision is a
//! [`Predicate`] which is applied in the left branch and refuted (`!predicate`) in the right
//! branch. The most common brancher is the [`IndependentVariableValueBrancher`], which first
//! selects a variable with a [`VariableSelector`] and then a value with a [`ValueSelector`]:
//! ```rust
//! # use gourd_core::branching::branchers::IndependentVariableValueBrancher;
//! # use gourd_core::branching::value_selection::InDomainMax;
//! # use gourd_core::branching::variable_selection::FirstFail;
//! # use gourd_core::results::SatisfactionResult;
//! # use gourd_core::termination::Indefinite;
//! # use gourd_core::Solver;
//! let mut solver = Solver::default();
//! let x = solver.new_bounded_integer(0, 4);
//! let y = solver.new_bounded_integer(2, 3);
//!
//! let mut brancher =
//!     IndependentVariableValueBrancher::new(FirstFail::new(&[x, y]), InDomainMax);
//! let result = solver.satisfy(&mut brancher, &mut Indefinite);
//!
//! let SatisfactionResult::Satisfiable(solution) = result else {
//!     panic!("the problem has solutions");
//! };
//! assert_eq!(solution.get_integer_value(x), 4);
//! assert_eq!(solution.get_integer_value(y), 3);
//! ```
//!
//! [`Predicate`]: crate::predicates::Predicate
mod brancher;
pub mod branchers;
mod selection_context;
pub mod value_selection;
pub mod variable_selection;

pub use brancher::Brancher;
pub use selection_context::SelectionContext;

#[cfg(doc)]
use crate::branching::branchers::IndependentVariableValueBrancher;
#[cfg(doc)]
use crate::branching::value_selection::ValueSelector;
#[cfg(doc)]
use crate::branching::variable_selection::VariableSelector;
#[cfg(doc)]
use crate::Solver;

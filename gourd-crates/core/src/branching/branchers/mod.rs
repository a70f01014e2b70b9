//! Implementations of [`crate::branching::Brancher`].
mod independent_variable_value_brancher;

pub use independent_variable_value_brancher::IndependentVariableValueBrancher;

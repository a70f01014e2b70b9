//! Selectors which pick the variable to branch on.
mod first_fail;
mod input_order;

pub use first_fail::FirstFail;
pub use input_order::InputOrder;

use crate::branching::SelectionContext;

/// A trait containing the interface for variable selectors; a selector returns [`None`] once
/// every variable it covers is fixed.
pub trait VariableSelector<Var> {
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<Var>;

    /// Called when the search encounters a failed node.
    fn on_conflict(&mut self) {}
}

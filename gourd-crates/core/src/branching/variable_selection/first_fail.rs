use log::warn;

use crate::branching::variable_selection::VariableSelector;
use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;

/// A [`VariableSelector`] which selects the unfixed variable with the smallest domain; ties are
/// broken by the order in which the variables were provided.
#[derive(Debug, Clone)]
pub struct FirstFail<Var> {
    variables: Vec<Var>,
}

impl<Var: Copy> FirstFail<Var> {
    pub fn new(variables: &[Var]) -> Self {
        if variables.is_empty() {
            warn!("The FirstFail variable selector was not provided with any variables");
        }
        FirstFail {
            variables: variables.to_vec(),
        }
    }
}

impl VariableSelector<DomainId> for FirstFail<DomainId> {
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<DomainId> {
        self.variables
            .iter()
            .copied()
            .filter(|&variable| !context.is_integer_fixed(variable))
            .min_by_key(|&variable| context.get_size_of_domain(variable))
    }
}

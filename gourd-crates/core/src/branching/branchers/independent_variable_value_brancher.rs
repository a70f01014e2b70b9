use std::marker::PhantomData;

use crate::basic_types::Solution;
use crate::branching::value_selection::InDomainMin;
use crate::branching::value_selection::ValueSelector;
use crate::branching::variable_selection::InputOrder;
use crate::branching::variable_selection::VariableSelector;
use crate::branching::Brancher;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;

/// An implementation of a [`Brancher`] which first selects a variable using the
/// [`VariableSelector`] and then selects a value for it using the [`ValueSelector`].
#[derive(Debug)]
pub struct IndependentVariableValueBrancher<Var, VariableSelect, ValueSelect> {
    pub(crate) variable_selector: VariableSelect,
    pub(crate) value_selector: ValueSelect,
    /// [`PhantomData`] to ensure that the variable type is bound to the
    /// [`IndependentVariableValueBrancher`].
    variable_type: PhantomData<Var>,
}

impl<Var, VariableSelect, ValueSelect>
    IndependentVariableValueBrancher<Var, VariableSelect, ValueSelect>
where
    VariableSelect: VariableSelector<Var>,
    ValueSelect: ValueSelector<Var>,
{
    pub fn new(variable_selector: VariableSelect, value_selector: ValueSelect) -> Self {
        IndependentVariableValueBrancher {
            variable_selector,
            value_selector,
            variable_type: PhantomData,
        }
    }
}

impl IndependentVariableValueBrancher<DomainId, InputOrder<DomainId>, InDomainMin> {
    /// Branches on the given variables in order, trying the smallest value first.
    pub fn input_order_min(variables: &[DomainId]) -> Self {
        IndependentVariableValueBrancher::new(InputOrder::new(variables), InDomainMin)
    }
}

impl<Var, VariableSelect, ValueSelect> Brancher
    for IndependentVariableValueBrancher<Var, VariableSelect, ValueSelect>
where
    VariableSelect: VariableSelector<Var>,
    ValueSelect: ValueSelector<Var>,
{
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Predicate> {
        self.variable_selector
            .select_variable(context)
            .map(|selected_variable| {
                self.value_selector
                    .select_value(context, selected_variable)
            })
    }

    fn on_conflict(&mut self) {
        self.variable_selector.on_conflict();
    }

    fn on_solution(&mut self, solution: &Solution) {
        self.value_selector.on_solution(solution);
    }
}

//! Selectors which pick the value (and thereby the decision) for a selected variable.
mod in_domain_max;
mod in_domain_min;
mod in_domain_random;

pub use in_domain_max::InDomainMax;
pub use in_domain_min::InDomainMin;
pub use in_domain_random::InDomainRandom;

use crate::basic_types::Solution;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;

/// A trait containing the interface for value selectors; given an unfixed variable it returns
/// the [`Predicate`] to apply in the left branch.
pub trait ValueSelector<Var> {
    fn select_value(&mut self, context: &mut SelectionContext, decision_variable: Var)
        -> Predicate;

    fn on_solution(&mut self, _solution: &Solution) {}
}

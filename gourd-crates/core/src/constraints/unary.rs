use super::Constraint;
use crate::predicate;
use crate::predicates::Predicate;
use crate::propagators::PredicateArgs;
use crate::variables::DomainId;

/// Creates the [`Constraint`] `variable <= value`.
pub fn less_than_or_equals(variable: DomainId, value: i32) -> Constraint {
    unary("less_than_or_equals", predicate!(variable <= value))
}

/// Creates the [`Constraint`] `variable >= value`.
pub fn greater_than_or_equals(variable: DomainId, value: i32) -> Constraint {
    unary("greater_than_or_equals", predicate!(variable >= value))
}

/// Creates the [`Constraint`] `variable != value`.
pub fn not_equals(variable: DomainId, value: i32) -> Constraint {
    unary("not_equals", predicate!(variable != value))
}

fn unary(name: &str, predicate: Predicate) -> Constraint {
    Constraint::new(name).with_propagator(PredicateArgs { predicate })
}

//! A variable, in the context of the solver, is a view onto a domain. [`DomainId`]s forward
//! domain information unaltered; an `i32` acts as a constant whose domain is a single value.

mod constant;
mod domain_id;
mod integer_variable;

pub use domain_id::DomainId;
pub use integer_variable::IntegerVariable;

//! The propagators of the constraints in [`crate::constraints`].
pub(crate) mod all_different;
pub(crate) mod arithmetic;
pub(crate) mod predicate_propagator;

pub(crate) use all_different::AllDifferentArgs;
pub(crate) use arithmetic::BinaryNotEqualsArgs;
pub(crate) use arithmetic::MaximumArgs;
pub(crate) use predicate_propagator::PredicateArgs;

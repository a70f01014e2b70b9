//! The domain store of the solver and the scheduling structures of the propagation engine.
mod assignments;
mod delta;
mod integer_domain;
mod propagator_queue;

pub use assignments::Assignments;
pub use assignments::IntegerDomainIterator;
pub use delta::DeltaMonitor;
pub(crate) use propagator_queue::PropagatorQueue;

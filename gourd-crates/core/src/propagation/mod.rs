//! Contains the main building blocks for propagators.
//!
//! A propagator takes a set of variables with their domains `D` and maps them to domains
//! `D' ⊆ D`, removing values which cannot be part of any solution of its constraint, or reports
//! a conflict when no solution remains.
//!
//! Each concrete propagator implements [`Propagator`] and is created by a
//! [`PropagatorConstructor`], which registers the propagator for the [`DomainEvents`] it wants to
//! be woken up by and starts the [`DeltaMonitor`]s it consumes. The engine calls
//! [`Propagator::propagate_from_scratch`] the first time and [`Propagator::propagate`]
//! afterwards.
//!
//! Propagators are not required to be idempotent; a propagator which is not at a fixed point
//! after a call is called again until no further reductions happen.

mod constructor;
mod contexts;
mod ids;
mod propagator;
pub(crate) mod store;

pub use constructor::PropagatorConstructor;
pub use constructor::PropagatorConstructorContext;
pub use contexts::HasAssignments;
pub use contexts::PropagationContext;
pub use contexts::PropagationContextMut;
pub use contexts::ReadDomains;
pub use ids::LocalId;
pub use ids::PropagatorId;
pub(crate) use ids::PropagatorVarId;
pub use propagator::EnqueueDecision;
pub use propagator::Entailment;
pub use propagator::Priority;
pub use propagator::Propagator;
pub use store::PropagatorHandle;

pub use crate::basic_types::Conflict;
pub use crate::basic_types::EmptyDomain;
pub use crate::basic_types::PropagationStatusCP;
pub use crate::basic_types::PropagatorConflict;
pub use crate::engine::cp::DeltaMonitor;
pub use crate::engine::notifications::DomainEvent;
pub use crate::engine::notifications::DomainEvents;

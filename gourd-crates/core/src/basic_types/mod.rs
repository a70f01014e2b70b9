mod constraint_operation_error;
mod propagation_status_cp;
mod solution;
mod trail;

pub use constraint_operation_error::ConfigurationError;
pub use constraint_operation_error::ConstraintOperationError;
pub use propagation_status_cp::Conflict;
pub use propagation_status_cp::EmptyDomain;
pub use propagation_status_cp::PropagationStatusCP;
pub use propagation_status_cp::PropagatorConflict;
pub use solution::Solution;
pub(crate) use trail::Trail;

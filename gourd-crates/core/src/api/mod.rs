pub(crate) mod outputs;
pub(crate) mod portfolio;
pub(crate) mod solver;

pub mod results {
    //! Contains the outputs of solving with the [`Solver`], and the [`Solution`]s they carry.
    //!
    //! - [`SatisfactionResult`] for [`Solver::satisfy`]
    //! - [`EnumerationResult`] for [`Solver::solutions`]
    //! - [`OptimisationResult`] for [`Solver::optimise`] and [`Portfolio::optimise`]
    pub use crate::api::outputs::EnumerationResult;
    pub use crate::api::outputs::OptimisationResult;
    pub use crate::api::outputs::SatisfactionResult;
    pub use crate::basic_types::Solution;
    #[cfg(doc)]
    use crate::Portfolio;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod variables {
    //! Contains the variables which can be created with the [`Solver`].
    //!
    //! Every variable is a [`DomainId`]; plain `i32` constants can be used wherever an
    //! [`IntegerVariable`] is expected.
    pub use crate::engine::cp::Assignments;
    pub use crate::engine::cp::IntegerDomainIterator;
    pub use crate::engine::notifications::Watchers;
    pub use crate::engine::variables::DomainId;
    pub use crate::engine::variables::IntegerVariable;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod options {
    //! Contains the options which can be passed to the [`Solver`] and the [`Portfolio`].
    pub use crate::api::portfolio::PortfolioOptions;
    pub use crate::engine::environment::EnvironmentKind;
    pub use crate::engine::NonIdempotencePolicy;
    pub use crate::engine::SolverOptions;
    #[cfg(doc)]
    use crate::Portfolio;
    #[cfg(doc)]
    use crate::Solver;
}

pub mod termination {
    //! Contains the conditions which can stop a search before it completes.
    pub use crate::engine::termination::budgets::*;
    pub use crate::engine::termination::combinator::*;
    pub use crate::engine::termination::indefinite::*;
    pub use crate::engine::termination::stop_flag::*;
    pub use crate::engine::termination::time_budget::*;
    pub use crate::engine::termination::TerminationCondition;
}

pub mod predicates {
    //! Contains structures which represent atomic constraints on a single variable, used as
    //! search decisions and posted by propagators.
    //!
    //! A [`Predicate`] is most easily created with the [`predicate!`](crate::predicate) macro.
    pub use crate::engine::predicates::Predicate;
    pub use crate::engine::predicates::PredicateConstructor;
    pub use crate::engine::predicates::PredicateType;
}

pub mod state {
    //! Contains the propagation state underlying the [`Solver`], and the counters it keeps.
    pub use crate::engine::EngineStatistics;
    pub use crate::engine::SolverStatistics;
    pub use crate::engine::State;
    #[cfg(doc)]
    use crate::Solver;
}

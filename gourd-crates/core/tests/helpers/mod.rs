#![allow(
    dead_code,
    reason = "it is used in other test files, but somehow compiler can't see it"
)]
#![cfg(test)]

use gourd_core::options::EnvironmentKind;
use gourd_core::options::SolverOptions;
use gourd_core::variables::DomainId;
use gourd_core::Solver;

/// Routes the `log` output of the solver to the test harness; `RUST_LOG` selects the level.
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn solver_with_environment(environment: EnvironmentKind) -> Solver {
    init_logging();
    Solver::with_options(SolverOptions {
        environment,
        ..Default::default()
    })
}

/// The domains of `variables`, in order.
pub(crate) fn domains(solver: &Solver, variables: &[DomainId]) -> Vec<Vec<i32>> {
    variables
        .iter()
        .map(|variable| solver.iterate_domain(variable).collect())
        .collect()
}

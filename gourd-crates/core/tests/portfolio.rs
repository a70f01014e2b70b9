mod helpers;

use gourd_core::constraints;
use gourd_core::optimisation::ResolutionPolicy;
use gourd_core::options::PortfolioOptions;
use gourd_core::results::OptimisationResult;
use gourd_core::termination::DecisionBudget;
use gourd_core::termination::Indefinite;
use gourd_core::variables::DomainId;
use gourd_core::ConfigurationError;
use gourd_core::DefaultBrancher;
use gourd_core::Portfolio;
use gourd_core::Solver;

use crate::helpers::init_logging;

/// Six distinct values in [0, 9] whose maximum is minimised; the optimum is 5.
fn model(_worker: usize, solver: &mut Solver) -> (DefaultBrancher, Option<DomainId>) {
    let variables = (0..6)
        .map(|_| solver.new_enumerated_integer(0, 9))
        .collect::<Vec<_>>();
    let objective = solver.new_bounded_integer(0, 9);

    let _ = solver
        .add_constraint(constraints::all_different(variables.clone()))
        .post();
    let _ = solver
        .add_constraint(constraints::maximum(variables, objective))
        .post();

    (solver.default_brancher(), Some(objective))
}

fn portfolio(num_workers: usize) -> Portfolio {
    Portfolio::new(PortfolioOptions {
        num_workers,
        base_seed: 5,
        ..Default::default()
    })
    .expect("there is a worker")
}

#[test]
fn workers_agree_on_the_optimum() {
    init_logging();

    let result = portfolio(3)
        .optimise(ResolutionPolicy::Minimise, model, |_| Indefinite)
        .expect("an objective is given");

    let OptimisationResult::Optimal(solution) = result else {
        panic!("expected an optimal solution, got {result:?}");
    };
    // The objective is the seventh variable of every worker.
    let (_, objective_value) = solution.iter().nth(6).expect("seven variables");
    assert_eq!(objective_value, 5);
}

#[test]
fn single_worker_matches_a_plain_solver() {
    init_logging();

    let mut solver = Solver::default();
    let (mut brancher, objective) = model(0, &mut solver);
    let expected = solver
        .optimise(
            &mut brancher,
            &mut Indefinite,
            ResolutionPolicy::Minimise,
            objective,
        )
        .expect("an objective is given");

    let result = portfolio(1)
        .optimise(ResolutionPolicy::Minimise, model, |_| Indefinite)
        .expect("an objective is given");

    let value = |result: &OptimisationResult| {
        result
            .solution()
            .and_then(|solution| solution.iter().nth(6))
            .map(|(_, value)| value)
    };
    assert!(expected.is_complete());
    assert!(result.is_complete());
    assert_eq!(value(&result), value(&expected));
}

#[test]
fn infeasible_model_is_unsatisfiable() {
    init_logging();

    let result = portfolio(2)
        .optimise(
            ResolutionPolicy::Maximise,
            |_, solver| {
                let variables = (0..3)
                    .map(|_| solver.new_enumerated_integer(0, 1))
                    .collect::<Vec<_>>();
                let _ = solver
                    .add_constraint(constraints::all_different(variables.clone()))
                    .post();
                (solver.default_brancher(), Some(variables[0]))
            },
            |_| Indefinite,
        )
        .expect("an objective is given");

    assert_eq!(result, OptimisationResult::Unsatisfiable);
}

#[test]
fn exhausted_budgets_give_an_incomplete_result() {
    init_logging();

    let result = portfolio(2)
        .optimise(ResolutionPolicy::Minimise, model, |_| DecisionBudget::new(0))
        .expect("an objective is given");

    assert_eq!(result, OptimisationResult::Unknown);
}

#[test]
fn satisfying_stops_at_the_first_solution() {
    init_logging();

    let result = portfolio(2)
        .optimise(ResolutionPolicy::Satisfy, model, |_| Indefinite)
        .expect("satisfying never needs an objective");

    assert!(matches!(result, OptimisationResult::Satisfiable(_)));
}

#[test]
fn configuration_errors_are_reported() {
    init_logging();

    assert_eq!(
        Portfolio::new(PortfolioOptions {
            num_workers: 0,
            ..Default::default()
        })
        .map(|_| ()),
        Err(ConfigurationError::EmptyPortfolio)
    );

    let result = portfolio(2).optimise(
        ResolutionPolicy::Minimise,
        |_, solver| {
            let _ = solver.new_boolean();
            (solver.default_brancher(), None)
        },
        |_| Indefinite,
    );
    assert_eq!(result, Err(ConfigurationError::MissingObjective));
}

mod helpers;

use gourd_core::constraints;
use gourd_core::optimisation::ResolutionPolicy;
use gourd_core::results::OptimisationResult;
use gourd_core::results::SatisfactionResult;
use gourd_core::termination::Indefinite;
use gourd_core::ConstraintOperationError;
use gourd_core::Solver;

use crate::helpers::domains;
use crate::helpers::init_logging;

#[test]
fn instantiation_is_removed_from_every_other_variable() {
    init_logging();
    let mut solver = Solver::default();
    let variables = (0..4)
        .map(|_| solver.new_enumerated_integer(1, 4))
        .collect::<Vec<_>>();

    let _ = solver
        .add_constraint(constraints::all_different(variables.clone()))
        .post()
        .expect("four values for four variables");
    let _ = solver
        .add_constraint(constraints::greater_than_or_equals(variables[0], 1))
        .post()
        .expect("the bound is already satisfied");

    assert_eq!(domains(&solver, &variables), vec![vec![1, 2, 3, 4]; 4]);

    let _ = solver
        .add_constraint(constraints::greater_than_or_equals(variables[0], 2))
        .post()
        .expect("2 is in the domain");
    let _ = solver
        .add_constraint(constraints::less_than_or_equals(variables[0], 2))
        .post()
        .expect("2 is in the domain");

    assert_eq!(
        domains(&solver, &variables),
        vec![vec![2], vec![1, 3, 4], vec![1, 3, 4], vec![1, 3, 4]]
    );
}

#[test]
fn pigeonhole_fails_before_any_decision() {
    init_logging();
    let mut solver = Solver::default();
    let variables = (0..5)
        .map(|_| solver.new_enumerated_integer(1, 4))
        .collect::<Vec<_>>();

    let result = solver
        .add_constraint(constraints::all_different(variables.clone()))
        .post();

    assert_eq!(result, Err(ConstraintOperationError::InfeasiblePropagator));
    assert!(solver.is_infeasible());
    assert_eq!(solver.statistics().num_decisions, 0);

    let result = solver
        .add_constraint(constraints::not_equals(variables[0], 1))
        .post();
    assert_eq!(result, Err(ConstraintOperationError::InfeasibleState));

    let mut brancher = solver.default_brancher();
    let result = solver.satisfy(&mut brancher, &mut Indefinite);
    assert_eq!(result, SatisfactionResult::Unsatisfiable);
    assert_eq!(solver.statistics().num_decisions, 0);
}

#[test]
fn pairwise_pigeonhole_needs_search() {
    init_logging();
    let mut solver = Solver::default();
    let variables = (0..4)
        .map(|_| solver.new_enumerated_integer(1, 3))
        .collect::<Vec<_>>();

    let _ = solver
        .add_constraint(constraints::all_different_pairwise(variables))
        .post()
        .expect("forward checking sees nothing at the root");

    let mut brancher = solver.default_brancher();
    let result = solver.satisfy(&mut brancher, &mut Indefinite);

    assert_eq!(result, SatisfactionResult::Unsatisfiable);
    assert!(solver.statistics().num_decisions > 0);
}

#[test]
fn maximum_bounds_the_objective_after_posting() {
    init_logging();
    let mut solver = Solver::default();
    let x = solver.new_bounded_integer(0, 6);
    let y = solver.new_bounded_integer(0, 10);
    let objective = solver.new_bounded_integer(-20, 20);

    let _ = solver
        .add_constraint(constraints::maximum(vec![x, y], objective))
        .post()
        .expect("the maximum can be anything in [0, 10]");

    assert_eq!(solver.lower_bound(&objective), 0);
    assert_eq!(solver.upper_bound(&objective), 10);

    let mut brancher = solver.default_brancher();
    let result = solver
        .optimise(
            &mut brancher,
            &mut Indefinite,
            ResolutionPolicy::Minimise,
            Some(objective),
        )
        .expect("an objective is given");

    let OptimisationResult::Optimal(solution) = result else {
        panic!("expected an optimal solution, got {result:?}");
    };
    assert_eq!(solution.get_value(objective), 0);
    assert_eq!(solution.get_value(x), 0);
    assert_eq!(solution.get_value(y), 0);
}

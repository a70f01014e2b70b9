mod helpers;

use gourd_core::constraints;
use gourd_core::options::EnvironmentKind;
use gourd_core::rand::rngs::SmallRng;
use gourd_core::rand::Rng;
use gourd_core::rand::SeedableRng;
use gourd_core::results::SatisfactionResult;
use gourd_core::termination::Indefinite;
use gourd_core::ConstraintOperationError;
use gourd_core::Solver;

use crate::helpers::domains;
use crate::helpers::init_logging;
use crate::helpers::solver_with_environment;

const ENVIRONMENTS: [EnvironmentKind; 2] = [EnvironmentKind::Trailing, EnvironmentKind::Copying];

#[test]
fn popping_restores_every_domain_exactly() {
    for environment in ENVIRONMENTS {
        let mut solver = solver_with_environment(environment);
        assert_eq!(solver.state().environment_kind(), environment);
        let variables = vec![
            solver.new_enumerated_integer(0, 9),
            solver.new_enumerated_integer(0, 9),
            solver.new_sparse_integer(vec![1, 3, 5, 7, 9]),
            solver.new_bounded_integer(-5, 5),
        ];
        let _ = solver
            .add_constraint(constraints::binary_not_equals(variables[0], variables[1]))
            .post()
            .expect("the root is consistent");

        let mut random = SmallRng::seed_from_u64(17);
        let mut snapshots = Vec::new();

        for _ in 0..40 {
            snapshots.push(domains(&solver, &variables));
            solver.push_world();

            let variable = variables[random.gen_range(0..variables.len())];
            let value = random.gen_range(-6..=10);
            let constraint = match random.gen_range(0..3) {
                0 => constraints::less_than_or_equals(variable, value),
                1 => constraints::greater_than_or_equals(variable, value),
                _ => constraints::not_equals(variable, value),
            };
            // Some of these empty a domain; the world is then infeasible until it is popped.
            let _ = solver.add_constraint(constraint).post_temporary();
        }

        while let Some(snapshot) = snapshots.pop() {
            solver.pop_world().expect("a world was pushed");
            assert_eq!(
                domains(&solver, &variables),
                snapshot,
                "{environment} at world {}",
                solver.world_index()
            );
        }

        assert_eq!(solver.world_index(), 0);
        assert!(!solver.is_infeasible());
    }
}

#[test]
fn temporary_constraints_disappear_with_their_world() {
    for environment in ENVIRONMENTS {
        let mut solver = solver_with_environment(environment);
        let x = solver.new_enumerated_integer(1, 3);
        let y = solver.new_enumerated_integer(1, 3);

        let _ = solver
            .add_constraint(constraints::binary_not_equals(x, y))
            .post()
            .expect("the root is consistent");

        solver.push_world();
        let reference = solver
            .add_constraint(constraints::less_than_or_equals(x, 1))
            .post_temporary()
            .expect("1 is in the domain");
        assert!(solver.constraint_status(&reference).is_some());
        assert_eq!(solver.iterate_domain(&y).collect::<Vec<_>>(), vec![2, 3]);

        solver.pop_world().expect("a world was pushed");

        assert!(solver.constraint_status(&reference).is_none());
        assert_eq!(solver.iterate_domain(&x).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(solver.iterate_domain(&y).collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}

#[test]
fn permanent_constraints_survive_popping() {
    init_logging();
    let mut solver = Solver::default();
    let x = solver.new_enumerated_integer(1, 3);
    let y = solver.new_enumerated_integer(1, 3);

    let _ = solver
        .add_constraint(constraints::less_than_or_equals(x, 1))
        .post()
        .expect("1 is in the domain");

    solver.push_world();
    let reference = solver
        .add_constraint(constraints::binary_not_equals(x, y))
        .post()
        .expect("y can avoid 1");
    assert!(!solver.contains(&y, 1));

    solver.pop_world().expect("a world was pushed");

    assert!(solver.constraint_status(&reference).is_some());
    assert!(!solver.contains(&y, 1));
}

#[test]
fn all_different_posted_in_a_world_sees_the_values_returned_by_popping() {
    for environment in ENVIRONMENTS {
        let mut solver = solver_with_environment(environment);
        let x = solver.new_enumerated_integer(1, 4);
        let y = solver.new_enumerated_integer(1, 3);

        solver.push_world();
        let _ = solver
            .add_constraint(constraints::less_than_or_equals(x, 1))
            .post_temporary()
            .expect("1 is in the domain");
        let _ = solver
            .add_constraint(constraints::all_different(vec![x, y]))
            .post()
            .expect("y can avoid 1");
        solver.pop_world().expect("a world was pushed");

        assert_eq!(domains(&solver, &[x, y]), vec![vec![1, 2, 3, 4], vec![1, 2, 3]]);

        let _ = solver
            .add_constraint(constraints::greater_than_or_equals(x, 4))
            .post()
            .expect("x = 4 leaves y free");
        let mut brancher = solver.default_brancher();
        let result = solver.satisfy(&mut brancher, &mut Indefinite);

        let SatisfactionResult::Satisfiable(solution) = result else {
            panic!("expected a solution with {environment}, got {result:?}");
        };
        assert_eq!(solution.get_value(x), 4);
        assert!((1..=3).contains(&solution.get_value(y)));
    }
}

#[test]
fn conflicting_world_is_left_by_popping() {
    init_logging();
    let mut solver = Solver::default();
    let x = solver.new_bounded_integer(0, 5);

    solver.push_world();
    let result = solver
        .add_constraint(constraints::greater_than_or_equals(x, 7))
        .post_temporary();
    assert_eq!(result, Err(ConstraintOperationError::InfeasiblePropagator));
    assert!(solver.is_infeasible());

    solver.pop_world().expect("a world was pushed");

    assert!(!solver.is_infeasible());
    assert_eq!(solver.upper_bound(&x), 5);
    let result = solver
        .add_constraint(constraints::less_than_or_equals(x, 2))
        .post();
    assert!(result.is_ok());
}

#[test]
fn popping_the_root_world_is_an_error() {
    init_logging();
    let mut solver = Solver::default();
    let _ = solver.new_boolean();

    assert_eq!(
        solver.pop_world(),
        Err(ConstraintOperationError::PoppedRootWorld)
    );

    solver.push_world();
    assert_eq!(solver.world_index(), 1);
    assert_eq!(solver.pop_world(), Ok(()));
    assert_eq!(
        solver.pop_world(),
        Err(ConstraintOperationError::PoppedRootWorld)
    );
}

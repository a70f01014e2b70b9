mod helpers;

use gourd_core::constraints;
use gourd_core::constraints::Constraint;
use gourd_core::constraints::ConstraintStatus;
use gourd_core::options::EnvironmentKind;
use gourd_core::options::SolverOptions;
use gourd_core::predicate;
use gourd_core::propagation::DomainEvents;
use gourd_core::propagation::Entailment;
use gourd_core::propagation::LocalId;
use gourd_core::propagation::PropagationContext;
use gourd_core::propagation::PropagationContextMut;
use gourd_core::propagation::PropagationStatusCP;
use gourd_core::propagation::Propagator;
use gourd_core::propagation::PropagatorConstructor;
use gourd_core::propagation::PropagatorConstructorContext;
use gourd_core::propagation::ReadDomains;
use gourd_core::rand::rngs::SmallRng;
use gourd_core::rand::Rng;
use gourd_core::rand::SeedableRng;
use gourd_core::results::SatisfactionResult;
use gourd_core::state::State;
use gourd_core::termination::Indefinite;
use gourd_core::variables::DomainId;
use gourd_core::Solver;

use crate::helpers::init_logging;

/// `x < y`, on bounds.
#[derive(Clone, Copy, Debug)]
struct LessThanArgs {
    x: DomainId,
    y: DomainId,
}

impl PropagatorConstructor for LessThanArgs {
    type PropagatorImpl = LessThan;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.x, DomainEvents::LOWER_BOUND, LocalId::from(0));
        context.register(self.y, DomainEvents::UPPER_BOUND, LocalId::from(1));

        LessThan {
            x: self.x,
            y: self.y,
        }
    }
}

#[derive(Clone, Debug)]
struct LessThan {
    x: DomainId,
    y: DomainId,
}

impl Propagator for LessThan {
    fn name(&self) -> &str {
        "LessThan"
    }

    fn propagate(&mut self, mut context: PropagationContextMut) -> PropagationStatusCP {
        let x_lower_bound = context.lower_bound(&self.x);
        let _ = context.set_lower_bound(&self.y, x_lower_bound + 1)?;

        let y_upper_bound = context.upper_bound(&self.y);
        let _ = context.set_upper_bound(&self.x, y_upper_bound - 1)?;

        Ok(())
    }

    fn is_entailed(&self, context: PropagationContext) -> Entailment {
        if context.upper_bound(&self.x) < context.lower_bound(&self.y) {
            Entailment::Entailed
        } else if context.lower_bound(&self.x) >= context.upper_bound(&self.y) {
            Entailment::Disentailed
        } else {
            Entailment::Undecided
        }
    }
}

fn snapshot(state: &State, variables: &[DomainId]) -> Vec<Vec<i32>> {
    variables
        .iter()
        .map(|variable| state.domain(variable))
        .collect()
}

fn is_subset(smaller: &[Vec<i32>], larger: &[Vec<i32>]) -> bool {
    smaller
        .iter()
        .zip(larger)
        .all(|(small, large)| small.iter().all(|value| large.contains(value)))
}

#[test]
fn fixed_point_is_stable_and_only_shrinks_domains() {
    init_logging();

    for environment in [EnvironmentKind::Trailing, EnvironmentKind::Copying] {
        let mut state = State::new(&SolverOptions {
            environment,
            ..Default::default()
        });
        let variables = (0..5)
            .map(|_| state.new_enumerated_variable(0, 20, None))
            .collect::<Vec<_>>();
        for pair in variables.windows(2) {
            let _ = state.add_propagator(
                LessThanArgs {
                    x: pair[0],
                    y: pair[1],
                },
                false,
            );
        }

        state
            .propagate_to_fixed_point()
            .expect("a chain of five fits in [0, 20]");
        assert_eq!(state.lower_bound(&variables[4]), 4);
        assert_eq!(state.upper_bound(&variables[0]), 16);

        let mut random = SmallRng::seed_from_u64(3);
        for _ in 0..10 {
            let before = snapshot(&state, &variables);
            state.new_checkpoint();

            let variable = variables[random.gen_range(0..variables.len())];
            let value = random.gen_range(0..=20);
            if state.post(predicate!(variable != value)).is_err()
                || state.propagate_to_fixed_point().is_err()
            {
                state.restore_to(state.get_checkpoint() - 1);
                assert_eq!(snapshot(&state, &variables), before);
                continue;
            }

            let after = snapshot(&state, &variables);
            assert!(is_subset(&after, &before), "{before:?} -> {after:?}");

            // A second fixed point does not change anything.
            state
                .propagate_to_fixed_point()
                .expect("the state is consistent");
            assert_eq!(snapshot(&state, &variables), after);
        }
    }
}

#[test]
fn user_propagators_take_part_in_search() {
    init_logging();
    let mut solver = Solver::default();
    let x = solver.new_bounded_integer(0, 3);
    let y = solver.new_bounded_integer(0, 3);

    let reference = solver
        .add_constraint(Constraint::new("less_than").with_propagator(LessThanArgs { x, y }))
        .post()
        .expect("x < y is satisfiable");

    assert_eq!(solver.upper_bound(&x), 2);
    assert_eq!(solver.lower_bound(&y), 1);
    assert_eq!(reference.name(), "less_than");

    let mut brancher = solver.default_brancher();
    let mut num_solutions = 0;
    let _ = solver.solutions(&mut brancher, &mut Indefinite, |solution| {
        assert!(solution.get_value(x) < solution.get_value(y));
        num_solutions += 1;
    });
    assert_eq!(num_solutions, 6);

    let result = solver.satisfy(&mut brancher, &mut Indefinite);
    assert!(matches!(result, SatisfactionResult::Satisfiable(_)));
}

#[test]
fn constraint_status_follows_the_domains() {
    init_logging();
    let mut solver = Solver::default();
    let x = solver.new_enumerated_integer(0, 3);
    let y = solver.new_enumerated_integer(0, 3);
    let reference = solver
        .add_constraint(constraints::binary_not_equals(x, y))
        .post()
        .expect("the root is consistent");

    assert_eq!(
        solver.constraint_status(&reference),
        Some(ConstraintStatus::Undetermined)
    );

    solver.push_world();
    let _ = solver
        .add_constraint(constraints::less_than_or_equals(x, 1))
        .post_temporary()
        .expect("the bound is consistent");
    let _ = solver
        .add_constraint(constraints::greater_than_or_equals(y, 2))
        .post_temporary()
        .expect("the bound is consistent");

    assert_eq!(
        solver.constraint_status(&reference),
        Some(ConstraintStatus::Satisfied)
    );

    solver.pop_world().expect("a world was pushed");
    assert_eq!(
        solver.constraint_status(&reference),
        Some(ConstraintStatus::Undetermined)
    );
}

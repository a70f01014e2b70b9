use std::sync::atomic::AtomicBool;
use std::thread;

use log::debug;
use log::info;

use super::outputs::OptimisationResult;
use super::solver::Solver;
use crate::basic_types::ConfigurationError;
use crate::basic_types::Solution;
use crate::branching::Brancher;
use crate::engine::termination::combinator::Combinator;
use crate::engine::termination::stop_flag::StopFlag;
use crate::engine::termination::TerminationCondition;
use crate::engine::variables::DomainId;
use crate::engine::SolverOptions;
use crate::optimisation::ObjectiveManager;
use crate::optimisation::ResolutionPolicy;
use crate::optimisation::SharedBound;

/// How a [`Portfolio`] runs its workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortfolioOptions {
    /// The number of solvers searching in parallel.
    pub num_workers: usize,
    /// Worker `i` seeds its random generator with `base_seed + i`.
    pub base_seed: u64,
    /// The options of every worker, apart from the seed.
    pub solver_options: SolverOptions,
}

impl Default for PortfolioOptions {
    fn default() -> Self {
        PortfolioOptions {
            num_workers: thread::available_parallelism().map_or(1, usize::from),
            base_seed: 42,
            solver_options: SolverOptions::default(),
        }
    }
}

/// Runs several independently seeded [`Solver`]s on the same model, each on its own thread.
///
/// The workers share nothing but a stop flag, raised as soon as one of them reaches a
/// definitive answer, and the best objective value found so far.
///
/// # Example
/// ```
/// # use gourd_core::constraints;
/// # use gourd_core::optimisation::ResolutionPolicy;
/// # use gourd_core::options::PortfolioOptions;
/// # use gourd_core::results::OptimisationResult;
/// # use gourd_core::termination::Indefinite;
/// # use gourd_core::Portfolio;
/// let portfolio = Portfolio::new(PortfolioOptions {
///     num_workers: 2,
///     ..Default::default()
/// })
/// .expect("there is a worker");
///
/// let result = portfolio
///     .optimise(
///         ResolutionPolicy::Maximise,
///         |_, solver| {
///             let x = solver.new_enumerated_integer(1, 4);
///             let y = solver.new_enumerated_integer(1, 4);
///             let _ = solver
///                 .add_constraint(constraints::binary_not_equals(x, y))
///                 .post();
///             let _ = solver
///                 .add_constraint(constraints::less_than_or_equals(x, 3))
///                 .post();
///             (solver.default_brancher(), Some(x))
///         },
///         |_| Indefinite,
///     )
///     .expect("an objective is given");
///
/// let OptimisationResult::Optimal(solution) = result else {
///     panic!("the search space is finite");
/// };
/// assert_eq!(solution.num_domains(), 2);
/// // `x` is the first variable of every worker.
/// assert_eq!(solution.iter().next().map(|(_, value)| value), Some(3));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Portfolio {
    options: PortfolioOptions,
}

impl Portfolio {
    pub fn new(options: PortfolioOptions) -> Result<Self, ConfigurationError> {
        if options.num_workers == 0 {
            return Err(ConfigurationError::EmptyPortfolio);
        }

        Ok(Portfolio { options })
    }

    pub fn options(&self) -> &PortfolioOptions {
        &self.options
    }

    /// Solves the model built by `model` on every worker and merges their results.
    ///
    /// `model` is called once per worker with the worker's index and a fresh solver; it returns
    /// the brancher to search with and the objective variable. `termination` creates the
    /// termination condition of every worker.
    ///
    /// The result is [`OptimisationResult::Optimal`] or [`OptimisationResult::Unsatisfiable`]
    /// if any worker completed its search, in which case the best solution across all workers
    /// is reported.
    pub fn optimise<B, T, Model, Termination>(
        &self,
        policy: ResolutionPolicy,
        model: Model,
        termination: Termination,
    ) -> Result<OptimisationResult, ConfigurationError>
    where
        B: Brancher,
        T: TerminationCondition,
        Model: Fn(usize, &mut Solver) -> (B, Option<DomainId>) + Sync,
        Termination: Fn(usize) -> T + Sync,
    {
        let stop = AtomicBool::new(false);
        let shared_bound = policy.direction().map(SharedBound::new);

        info!(
            "starting a portfolio of {} workers to {policy}",
            self.options.num_workers
        );

        let outcomes = thread::scope(|scope| {
            let workers = (0..self.options.num_workers)
                .map(|index| {
                    let worker = Worker {
                        index,
                        policy,
                        stop: &stop,
                        shared_bound: shared_bound.as_ref(),
                        solver_options: SolverOptions {
                            random_seed: self.options.base_seed.wrapping_add(index as u64),
                            ..self.options.solver_options
                        },
                    };
                    let model = &model;
                    let termination = &termination;
                    scope.spawn(move || worker.run(model, termination))
                })
                .collect::<Vec<_>>();

            workers
                .into_iter()
                .map(|worker| match worker.join() {
                    Ok(outcome) => outcome,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect::<Result<Vec<_>, _>>()
        })?;

        Ok(merge(policy, outcomes))
    }
}

/// What a single worker reports back: its result and the objective value of its solution.
struct WorkerOutcome {
    result: OptimisationResult,
    objective_value: Option<i32>,
}

struct Worker<'a> {
    index: usize,
    policy: ResolutionPolicy,
    stop: &'a AtomicBool,
    shared_bound: Option<&'a SharedBound>,
    solver_options: SolverOptions,
}

impl Worker<'_> {
    fn run<B, T>(
        self,
        model: &impl Fn(usize, &mut Solver) -> (B, Option<DomainId>),
        termination: &impl Fn(usize) -> T,
    ) -> Result<WorkerOutcome, ConfigurationError>
    where
        B: Brancher,
        T: TerminationCondition,
    {
        let mut solver = Solver::with_options(self.solver_options);
        let (mut brancher, objective) = model(self.index, &mut solver);
        let manager = ObjectiveManager::new(self.policy, objective)?;

        let stop_flag = StopFlag::new(self.stop);
        let mut termination = Combinator::new(stop_flag, termination(self.index));

        let result =
            solver.optimise_with(&mut brancher, &mut termination, manager, self.shared_bound);

        let found_answer = match self.policy {
            ResolutionPolicy::Satisfy => !matches!(result, OptimisationResult::Unknown),
            ResolutionPolicy::Minimise | ResolutionPolicy::Maximise => result.is_complete(),
        };
        if found_answer {
            debug!("worker {} stops the portfolio", self.index);
            stop_flag.raise();
        }

        let objective_value = objective
            .zip(result.solution())
            .map(|(objective, solution)| solution.get_value(objective));

        Ok(WorkerOutcome {
            result,
            objective_value,
        })
    }
}

fn merge(policy: ResolutionPolicy, outcomes: Vec<WorkerOutcome>) -> OptimisationResult {
    let is_complete = outcomes.iter().any(|outcome| outcome.result.is_complete());

    let mut best: Option<(Option<i32>, Solution)> = None;
    for outcome in outcomes {
        let objective_value = outcome.objective_value;
        let Some(solution) = outcome.result.solution().cloned() else {
            continue;
        };

        let improves = match (&best, policy.direction(), objective_value) {
            (None, _, _) => true,
            (Some((Some(incumbent), _)), Some(direction), Some(candidate)) => {
                direction.is_improvement(candidate, *incumbent)
            }
            _ => false,
        };
        if improves {
            best = Some((objective_value, solution));
        }
    }

    match (policy.direction(), best) {
        (None, Some((_, solution))) => OptimisationResult::Satisfiable(solution),
        (Some(_), Some((_, solution))) if is_complete => OptimisationResult::Optimal(solution),
        (Some(_), Some((_, solution))) => OptimisationResult::Satisfiable(solution),
        (_, None) if is_complete => OptimisationResult::Unsatisfiable,
        (_, None) => OptimisationResult::Unknown,
    }
}

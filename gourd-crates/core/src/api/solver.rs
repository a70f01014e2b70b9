use std::ops::ControlFlow;

use log::debug;
use log::warn;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::outputs::EnumerationResult;
use super::outputs::OptimisationResult;
use super::outputs::SatisfactionResult;
use crate::basic_types::ConfigurationError;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Solution;
use crate::branching::branchers::IndependentVariableValueBrancher;
use crate::branching::value_selection::InDomainMin;
use crate::branching::variable_selection::FirstFail;
use crate::branching::Brancher;
use crate::constraints::Constraint;
use crate::constraints::ConstraintPoster;
use crate::constraints::ConstraintReference;
use crate::constraints::ConstraintStatus;
use crate::engine::predicates::Predicate;
use crate::engine::search::depth_first_search;
use crate::engine::search::SearchObserver;
use crate::engine::search::SearchOutcome;
use crate::engine::termination::TerminationCondition;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::SolverOptions;
use crate::engine::SolverStatistics;
use crate::engine::State;
use crate::optimisation::ObjectiveBound;
use crate::optimisation::ObjectiveBoundArgs;
use crate::optimisation::ObjectiveManager;
use crate::optimisation::ResolutionPolicy;
use crate::optimisation::SharedBound;
use crate::propagation::PropagatorHandle;
use crate::statistics::log_statistic_postfix;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The [`Brancher`] returned by [`Solver::default_brancher`]: the variable with the smallest
/// domain first, its smallest value first.
pub type DefaultBrancher =
    IndependentVariableValueBrancher<DomainId, FirstFail<DomainId>, InDomainMin>;

/// The main interaction point which allows the creation of variables, the addition of
/// constraints, and solving problems.
///
/// # Creating Variables
/// ```rust
/// # use gourd_core::Solver;
/// let mut solver = Solver::default();
///
/// // A variable with the domain [0, 10] which only keeps track of its bounds.
/// let bounded = solver.new_bounded_integer(0, 10);
///
/// // A variable with the domain [0, 10] in which values can be removed from the middle.
/// let enumerated = solver.new_named_enumerated_integer(0, 10, "x");
/// assert_eq!(solver.variable_name(enumerated), Some("x"));
/// assert_eq!(solver.variable_name(bounded), None);
///
/// // A variable with a non-contiguous domain.
/// let sparse = solver.new_sparse_integer(vec![0, 3, 5]);
/// assert_eq!(solver.iterate_domain(&sparse).collect::<Vec<_>>(), vec![0, 3, 5]);
///
/// let boolean = solver.new_boolean();
/// assert_eq!(solver.size(&boolean), 2);
/// ```
///
/// # Worlds
/// Constraints can be posted temporarily, in which case they are removed when the world they
/// were posted in is popped.
/// ```rust
/// # use gourd_core::constraints;
/// # use gourd_core::Solver;
/// let mut solver = Solver::default();
/// let x = solver.new_bounded_integer(0, 10);
///
/// solver.push_world();
/// let _ = solver
///     .add_constraint(constraints::less_than_or_equals(x, 4))
///     .post_temporary()
///     .expect("x can be at most 4");
/// assert_eq!(solver.upper_bound(&x), 4);
///
/// solver.pop_world().expect("a world was pushed");
/// assert_eq!(solver.upper_bound(&x), 10);
/// ```
pub struct Solver {
    state: State,
    options: SolverOptions,
    random_generator: SmallRng,
    statistics: SolverStatistics,
    /// The world whose propagation ended in a conflict; nothing can be solved until it is
    /// popped.
    conflicting_world: Option<usize>,
    /// Called with every solution found while optimising.
    solution_callback: Box<dyn Fn(&Solution)>,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::with_options(SolverOptions::default())
    }
}

impl std::fmt::Debug for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("state", &self.state)
            .field("options", &self.options)
            .field("statistics", &self.statistics)
            .field("conflicting_world", &self.conflicting_world)
            .finish()
    }
}

impl Solver {
    pub fn with_options(options: SolverOptions) -> Self {
        Solver {
            state: State::new(&options),
            options,
            random_generator: SmallRng::seed_from_u64(options.random_seed),
            statistics: SolverStatistics::default(),
            conflicting_world: None,
            solution_callback: Box::new(|_| {}),
        }
    }

    /// Adds a call-back which is called every time a solution is found by
    /// [`Solver::optimise`], including the final one.
    pub fn with_solution_callback(&mut self, solution_callback: impl Fn(&Solution) + 'static) {
        self.solution_callback = Box::new(solution_callback);
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// The propagation state, e.g. for [`ConstraintReference::status`].
    pub fn state(&self) -> &State {
        &self.state
    }

    /// The counters of the searches performed so far.
    pub fn statistics(&self) -> SolverStatistics {
        SolverStatistics {
            engine: self.state.statistics(),
            ..self.statistics
        }
    }

    /// Logs the statistics of the solver and of every propagator.
    pub fn log_statistics(&self) {
        let statistic_logger = StatisticLogger::default();
        self.statistics()
            .log(statistic_logger.attach_to_prefix("solver"));
        self.state
            .log_statistics(&statistic_logger.attach_to_prefix("propagator"));
        log_statistic_postfix();
    }
}

/// Functions to create variables.
impl Solver {
    /// Create a new integer variable with the domain `[lower_bound, upper_bound]`. Only its
    /// bounds are tracked; removing a value from the middle of the domain has no effect.
    pub fn new_bounded_integer(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        self.state
            .new_interval_variable(lower_bound, upper_bound, None)
    }

    pub fn new_named_bounded_integer(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: impl Into<String>,
    ) -> DomainId {
        self.state
            .new_interval_variable(lower_bound, upper_bound, Some(name.into()))
    }

    /// Create a new integer variable with the domain `[lower_bound, upper_bound]`, from which
    /// any value can be removed.
    pub fn new_enumerated_integer(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        self.state
            .new_enumerated_variable(lower_bound, upper_bound, None)
    }

    pub fn new_named_enumerated_integer(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: impl Into<String>,
    ) -> DomainId {
        self.state
            .new_enumerated_variable(lower_bound, upper_bound, Some(name.into()))
    }

    /// Create a new integer variable whose domain consists of the given values. Duplicates are
    /// ignored.
    pub fn new_sparse_integer(&mut self, values: impl Into<Vec<i32>>) -> DomainId {
        self.state.new_sparse_variable(values.into(), None)
    }

    pub fn new_named_sparse_integer(
        &mut self,
        values: impl Into<Vec<i32>>,
        name: impl Into<String>,
    ) -> DomainId {
        self.state
            .new_sparse_variable(values.into(), Some(name.into()))
    }

    /// Create a new variable with the domain `{0, 1}`.
    pub fn new_boolean(&mut self) -> DomainId {
        self.state.new_interval_variable(0, 1, None)
    }

    pub fn new_named_boolean(&mut self, name: impl Into<String>) -> DomainId {
        self.state.new_interval_variable(0, 1, Some(name.into()))
    }
}

/// Functions to query the domains of the current world.
impl Solver {
    pub fn lower_bound(&self, variable: &impl IntegerVariable) -> i32 {
        self.state.lower_bound(variable)
    }

    pub fn upper_bound(&self, variable: &impl IntegerVariable) -> i32 {
        self.state.upper_bound(variable)
    }

    pub fn contains(&self, variable: &impl IntegerVariable, value: i32) -> bool {
        self.state.contains(variable, value)
    }

    pub fn size(&self, variable: &impl IntegerVariable) -> u32 {
        self.state.size(variable)
    }

    pub fn is_fixed(&self, variable: &impl IntegerVariable) -> bool {
        variable.is_fixed(&self.state.assignments)
    }

    /// The smallest value in the domain which is strictly larger than `value`.
    pub fn next_value(&self, variable: &impl IntegerVariable, value: i32) -> Option<i32> {
        variable.next_value(&self.state.assignments, value)
    }

    /// The largest value in the domain which is strictly smaller than `value`.
    pub fn previous_value(&self, variable: &impl IntegerVariable, value: i32) -> Option<i32> {
        variable.previous_value(&self.state.assignments, value)
    }

    /// The values in the domain, in increasing order.
    pub fn iterate_domain(
        &self,
        variable: &impl IntegerVariable,
    ) -> impl Iterator<Item = i32> + '_ {
        variable.iterate_domain(&self.state.assignments)
    }

    /// Whether the predicate holds for every value (`Some(true)`), for no value
    /// (`Some(false)`) or for some values of the domain.
    pub fn truth_value(&self, predicate: Predicate) -> Option<bool> {
        self.state.truth_value(predicate)
    }

    /// The name given to the variable on creation, if any.
    pub fn variable_name(&self, variable: DomainId) -> Option<&str> {
        self.state.variable_name(variable)
    }

    /// Whether some constraint is known to be violated in the current world.
    pub fn is_infeasible(&self) -> bool {
        self.conflicting_world.is_some()
    }
}

/// Functions to add constraints and to manage worlds.
impl Solver {
    /// Add a constraint to the solver. The returned [`ConstraintPoster`] decides whether it is
    /// posted permanently or temporarily.
    ///
    /// # Example
    /// ```
    /// # use gourd_core::constraints;
    /// # use gourd_core::ConstraintOperationError;
    /// # use gourd_core::Solver;
    /// let mut solver = Solver::default();
    /// let x = solver.new_enumerated_integer(1, 2);
    /// let y = solver.new_enumerated_integer(1, 2);
    /// let z = solver.new_enumerated_integer(1, 2);
    ///
    /// let result = solver
    ///     .add_constraint(constraints::all_different(vec![x, y, z]))
    ///     .post();
    /// assert_eq!(result, Err(ConstraintOperationError::InfeasiblePropagator));
    /// ```
    pub fn add_constraint(&mut self, constraint: Constraint) -> ConstraintPoster<'_> {
        ConstraintPoster::new(self, constraint)
    }

    pub(crate) fn post_constraint(
        &mut self,
        constraint: Constraint,
        temporary: bool,
    ) -> Result<ConstraintReference, ConstraintOperationError> {
        if self.conflicting_world.is_some() {
            return Err(ConstraintOperationError::InfeasibleState);
        }

        let reference = constraint.add_to(&mut self.state, temporary);

        if let Err(conflict) = self.state.propagate_to_fixed_point() {
            debug!("posting '{}' led to a conflict: {conflict}", reference.name());
            self.conflicting_world = Some(self.state.get_checkpoint());
            return Err(ConstraintOperationError::InfeasiblePropagator);
        }

        Ok(reference)
    }

    /// The status of a posted constraint, or [`None`] if it was posted temporarily in a world
    /// which has been popped.
    pub fn constraint_status(&self, reference: &ConstraintReference) -> Option<ConstraintStatus> {
        reference.status(&self.state)
    }

    /// Create a new world; everything changed from now on is undone by [`Solver::pop_world`].
    pub fn push_world(&mut self) {
        self.state.new_checkpoint();
    }

    /// Return to the world before the last [`Solver::push_world`], removing the temporary
    /// constraints posted since.
    pub fn pop_world(&mut self) -> Result<(), ConstraintOperationError> {
        let world = self.state.get_checkpoint();
        if world == 0 {
            return Err(ConstraintOperationError::PoppedRootWorld);
        }

        self.state.restore_to(world - 1);
        if matches!(self.conflicting_world, Some(conflicting) if conflicting >= world) {
            self.conflicting_world = None;
        }

        // Propagators added in the popped world re-establish their reductions.
        if self.conflicting_world.is_none() && self.state.propagate_to_fixed_point().is_err() {
            self.conflicting_world = Some(world - 1);
        }

        Ok(())
    }

    /// The number of worlds pushed and not yet popped.
    pub fn world_index(&self) -> usize {
        self.state.get_checkpoint()
    }
}

/// Functions for solving with the constraints that have been added to the [`Solver`].
impl Solver {
    /// A [`Brancher`] over every variable created so far, see [`DefaultBrancher`].
    pub fn default_brancher(&self) -> DefaultBrancher {
        let variables = self.state.assignments.get_domains().collect::<Vec<_>>();
        IndependentVariableValueBrancher::new(FirstFail::new(&variables), InDomainMin)
    }

    /// Searches for a solution, until one is found, the search space is exhausted or the
    /// [`TerminationCondition`] triggers.
    ///
    /// The domains are left as they were before the call.
    pub fn satisfy<B, T>(&mut self, brancher: &mut B, termination: &mut T) -> SatisfactionResult
    where
        B: Brancher + ?Sized,
        T: TerminationCondition + ?Sized,
    {
        if !self.is_at_fixed_point() {
            return SatisfactionResult::Unsatisfiable;
        }

        let mut observer = FirstSolution { solution: None };
        let outcome = self.search(brancher, termination, &mut observer);

        match (observer.solution, outcome) {
            (Some(solution), _) => SatisfactionResult::Satisfiable(solution),
            (None, SearchOutcome::Exhausted) => SatisfactionResult::Unsatisfiable,
            (None, SearchOutcome::Stopped) => SatisfactionResult::Unknown,
        }
    }

    /// Reports every solution to `on_solution`, until the search space is exhausted or the
    /// [`TerminationCondition`] triggers.
    ///
    /// # Example
    /// ```
    /// # use gourd_core::constraints;
    /// # use gourd_core::results::EnumerationResult;
    /// # use gourd_core::termination::Indefinite;
    /// # use gourd_core::Solver;
    /// let mut solver = Solver::default();
    /// let x = solver.new_enumerated_integer(1, 3);
    /// let y = solver.new_enumerated_integer(1, 3);
    /// let _ = solver
    ///     .add_constraint(constraints::binary_not_equals(x, y))
    ///     .post();
    ///
    /// let mut brancher = solver.default_brancher();
    /// let mut pairs = Vec::new();
    /// let result = solver.solutions(&mut brancher, &mut Indefinite, |solution| {
    ///     pairs.push((solution.get_value(x), solution.get_value(y)));
    /// });
    ///
    /// assert_eq!(result, EnumerationResult::Complete { num_solutions: 6 });
    /// assert!(pairs.iter().all(|(x, y)| x != y));
    /// ```
    pub fn solutions<B, T, F>(
        &mut self,
        brancher: &mut B,
        termination: &mut T,
        on_solution: F,
    ) -> EnumerationResult
    where
        B: Brancher + ?Sized,
        T: TerminationCondition + ?Sized,
        F: FnMut(&Solution),
    {
        if !self.is_at_fixed_point() {
            return EnumerationResult::Complete { num_solutions: 0 };
        }

        let mut observer = EverySolution {
            on_solution,
            num_solutions: 0,
        };
        let outcome = self.search(brancher, termination, &mut observer);
        let num_solutions = observer.num_solutions;

        match outcome {
            SearchOutcome::Exhausted => EnumerationResult::Complete { num_solutions },
            SearchOutcome::Stopped => EnumerationResult::Incomplete { num_solutions },
        }
    }

    /// Optimises `objective` according to `policy` by branch-and-bound: after every solution,
    /// only strictly better solutions are searched for.
    ///
    /// With [`ResolutionPolicy::Satisfy`] the search stops at the first solution, which is
    /// reported as [`OptimisationResult::Satisfiable`].
    ///
    /// # Example
    /// ```
    /// # use gourd_core::constraints;
    /// # use gourd_core::optimisation::ResolutionPolicy;
    /// # use gourd_core::results::OptimisationResult;
    /// # use gourd_core::termination::Indefinite;
    /// # use gourd_core::Solver;
    /// let mut solver = Solver::default();
    /// let x = solver.new_bounded_integer(0, 6);
    /// let y = solver.new_bounded_integer(3, 10);
    /// let objective = solver.new_bounded_integer(0, 20);
    /// let _ = solver
    ///     .add_constraint(constraints::maximum(vec![x, y], objective))
    ///     .post();
    ///
    /// let mut brancher = solver.default_brancher();
    /// let result = solver
    ///     .optimise(
    ///         &mut brancher,
    ///         &mut Indefinite,
    ///         ResolutionPolicy::Minimise,
    ///         Some(objective),
    ///     )
    ///     .expect("an objective is given");
    ///
    /// let OptimisationResult::Optimal(solution) = result else {
    ///     panic!("the search space is finite");
    /// };
    /// assert_eq!(solution.get_value(objective), 3);
    /// ```
    pub fn optimise<B, T>(
        &mut self,
        brancher: &mut B,
        termination: &mut T,
        policy: ResolutionPolicy,
        objective: Option<DomainId>,
    ) -> Result<OptimisationResult, ConfigurationError>
    where
        B: Brancher + ?Sized,
        T: TerminationCondition + ?Sized,
    {
        let manager = ObjectiveManager::new(policy, objective)?;
        Ok(self.optimise_with(brancher, termination, manager, None))
    }

    /// Optimises according to `manager`, adopting the bounds published in `shared_bound` by
    /// other solvers and publishing its own.
    pub(crate) fn optimise_with<B, T>(
        &mut self,
        brancher: &mut B,
        termination: &mut T,
        mut manager: ObjectiveManager,
        shared_bound: Option<&SharedBound>,
    ) -> OptimisationResult
    where
        B: Brancher + ?Sized,
        T: TerminationCondition + ?Sized,
    {
        let (Some(direction), Some(objective)) = (manager.policy().direction(), manager.objective())
        else {
            return match self.satisfy(brancher, termination) {
                SatisfactionResult::Satisfiable(solution) => {
                    (self.solution_callback)(&solution);
                    OptimisationResult::Satisfiable(solution)
                }
                SatisfactionResult::Unsatisfiable => OptimisationResult::Unsatisfiable,
                SatisfactionResult::Unknown => OptimisationResult::Unknown,
            };
        };

        if !self.is_at_fixed_point() {
            return OptimisationResult::Unsatisfiable;
        }

        debug!("{} {objective}", manager.policy());

        let root = self.state.get_checkpoint();
        self.state.new_checkpoint();
        let bound = self
            .state
            .add_propagator(ObjectiveBoundArgs { objective, direction }, true);
        self.state.rerun_after_every_restore(bound.propagator_id());

        let mut observer = Optimiser {
            manager: &mut manager,
            bound,
            shared_bound,
            best_solution: None,
            solution_callback: &*self.solution_callback,
        };
        let outcome = depth_first_search(
            &mut self.state,
            brancher,
            termination,
            &mut self.random_generator,
            &mut self.statistics,
            &mut observer,
        );
        let best_solution = observer.best_solution;

        self.state.restore_to(root);

        match (outcome, best_solution) {
            (SearchOutcome::Exhausted, Some(solution)) => OptimisationResult::Optimal(solution),
            (SearchOutcome::Exhausted, None) => OptimisationResult::Unsatisfiable,
            (SearchOutcome::Stopped, Some(solution)) => OptimisationResult::Satisfiable(solution),
            (SearchOutcome::Stopped, None) => OptimisationResult::Unknown,
        }
    }

    fn search<B, T, O>(
        &mut self,
        brancher: &mut B,
        termination: &mut T,
        observer: &mut O,
    ) -> SearchOutcome
    where
        B: Brancher + ?Sized,
        T: TerminationCondition + ?Sized,
        O: SearchObserver,
    {
        depth_first_search(
            &mut self.state,
            brancher,
            termination,
            &mut self.random_generator,
            &mut self.statistics,
            observer,
        )
    }

    /// Propagates the current world; returns `false` if it is (or becomes) infeasible.
    fn is_at_fixed_point(&mut self) -> bool {
        if self.conflicting_world.is_some() {
            return false;
        }

        if let Err(conflict) = self.state.propagate_to_fixed_point() {
            warn!("the current world is infeasible: {conflict}");
            self.conflicting_world = Some(self.state.get_checkpoint());
            return false;
        }

        true
    }
}

/// Stops the search at the first solution.
struct FirstSolution {
    solution: Option<Solution>,
}

impl SearchObserver for FirstSolution {
    fn on_solution(&mut self, _state: &mut State, solution: Solution) -> ControlFlow<()> {
        self.solution = Some(solution);
        ControlFlow::Break(())
    }
}

struct EverySolution<F> {
    on_solution: F,
    num_solutions: u64,
}

impl<F: FnMut(&Solution)> SearchObserver for EverySolution<F> {
    fn on_solution(&mut self, _state: &mut State, solution: Solution) -> ControlFlow<()> {
        self.num_solutions += 1;
        (self.on_solution)(&solution);
        ControlFlow::Continue(())
    }
}

/// Keeps the best solution and tightens the objective bound after every solution.
struct Optimiser<'a> {
    manager: &'a mut ObjectiveManager,
    bound: PropagatorHandle<ObjectiveBound>,
    shared_bound: Option<&'a SharedBound>,
    best_solution: Option<Solution>,
    solution_callback: &'a dyn Fn(&Solution),
}

impl Optimiser<'_> {
    fn tighten(&self, state: &mut State, value: i32) {
        if let Some(bound) = state.get_propagator_mut(self.bound) {
            bound.tighten(value);
        }
        state.enqueue_propagator(self.bound.propagator_id());
    }
}

impl SearchObserver for Optimiser<'_> {
    fn on_solution(&mut self, state: &mut State, solution: Solution) -> ControlFlow<()> {
        if let Some(value) = self.manager.on_solution(&solution) {
            self.tighten(state, value);

            if let Some(shared_bound) = self.shared_bound {
                let _ = shared_bound.publish(value);
            }
        }

        (self.solution_callback)(&solution);
        self.best_solution = Some(solution);
        ControlFlow::Continue(())
    }

    fn before_branching(&mut self, state: &mut State) -> bool {
        let Some(value) = self.shared_bound.and_then(SharedBound::get) else {
            return false;
        };
        if !self.manager.improve_bound(value) {
            return false;
        }

        debug!("adopting objective bound {value} found by another worker");
        self.tighten(state, value);
        true
    }
}

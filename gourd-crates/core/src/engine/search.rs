//! Depth-first search over [`Predicate`] decisions.
//!
//! Every decision is applied in a fresh world; when the subtree below a decision is exhausted
//! (or contains a solution which has been reported), the world is popped and the negation of
//! the decision is applied in the parent world instead.
use std::ops::ControlFlow;
use std::time::Instant;

use log::debug;
use log::info;
use log::trace;
use rand::rngs::SmallRng;

use super::solver_statistics::SolverStatistics;
use super::termination::TerminationCondition;
use super::State;
use crate::basic_types::Conflict;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::Solution;
use crate::branching::Brancher;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::gourd_assert_simple;
use crate::predicate;

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchOutcome {
    /// The whole search space has been explored.
    Exhausted,
    /// The termination condition fired, or the observer asked to stop.
    Stopped,
}

/// Reacts to the events of a search.
pub(crate) trait SearchObserver {
    /// Called with every solution. Returning [`ControlFlow::Break`] ends the search, otherwise
    /// it continues with the next branch.
    fn on_solution(&mut self, state: &mut State, solution: Solution) -> ControlFlow<()>;

    /// Called at every node before a decision is taken. Returns whether the state has to be
    /// propagated again, e.g. because a bound was tightened.
    fn before_branching(&mut self, _state: &mut State) -> bool {
        false
    }
}

/// The bookkeeping of a single search.
struct Search<'a, B: ?Sized, T: ?Sized> {
    state: &'a mut State,
    brancher: &'a mut B,
    termination: &'a mut T,
    random_generator: &'a mut SmallRng,
    statistics: &'a mut SolverStatistics,
    /// The world in which the search started; decision `i` lives in world `base + i + 1`.
    base: usize,
    decisions: Vec<Predicate>,
}

/// Explores the search space below the current state of `state`, reporting every solution to
/// the observer. The state is restored to the world it was in when the search started.
pub(crate) fn depth_first_search<B, T, O>(
    state: &mut State,
    brancher: &mut B,
    termination: &mut T,
    random_generator: &mut SmallRng,
    statistics: &mut SolverStatistics,
    observer: &mut O,
) -> SearchOutcome
where
    B: Brancher + ?Sized,
    T: TerminationCondition + ?Sized,
    O: SearchObserver + ?Sized,
{
    let started = Instant::now();
    let root = state.get_checkpoint();
    info!("starting search in world {root}");

    let outcome = if state.propagate_to_fixed_point().is_err() {
        statistics.num_failures += 1;
        SearchOutcome::Exhausted
    } else {
        // Refutations of the first decision are applied in a world of their own, so the
        // starting world is left untouched.
        state.new_checkpoint();

        let mut search = Search {
            base: state.get_checkpoint(),
            state: &mut *state,
            brancher,
            termination,
            random_generator,
            statistics: &mut *statistics,
            decisions: Vec::new(),
        };
        search.run(observer)
    };

    state.restore_to(root);

    let elapsed = started.elapsed();
    statistics.time_spent_in_search_ms += elapsed.as_millis() as u64;
    info!(
        "search ended ({outcome:?}) after {} decisions and {} solutions in {:.3}s",
        statistics.num_decisions,
        statistics.num_solutions,
        elapsed.as_secs_f64()
    );

    outcome
}

impl<B, T> Search<'_, B, T>
where
    B: Brancher + ?Sized,
    T: TerminationCondition + ?Sized,
{
    fn run<O: SearchObserver + ?Sized>(&mut self, observer: &mut O) -> SearchOutcome {
        loop {
            if self.termination.should_stop() {
                debug!("termination condition fired at depth {}", self.decisions.len());
                return SearchOutcome::Stopped;
            }

            if observer.before_branching(self.state) {
                if let Err(conflict) = self.state.propagate_to_fixed_point() {
                    self.record_failure(conflict);
                    if !self.backtrack() {
                        return SearchOutcome::Exhausted;
                    }
                    continue;
                }
            }

            let Some(decision) = self.next_decision() else {
                let solution = self.state.solution();
                self.statistics.num_solutions += 1;
                self.termination.solution_has_been_found();
                self.brancher.on_solution(&solution);
                debug!(
                    "solution {} found at depth {}",
                    self.statistics.num_solutions,
                    self.decisions.len()
                );

                if observer.on_solution(self.state, solution).is_break() {
                    return SearchOutcome::Stopped;
                }
                if !self.backtrack() {
                    return SearchOutcome::Exhausted;
                }
                continue;
            };

            gourd_assert_simple!(
                self.state.truth_value(decision) != Some(true),
                "the decision {decision} does not change the domain of its variable"
            );

            self.statistics.num_decisions += 1;
            self.termination.decision_has_been_made();
            trace!("decision {decision} at depth {}", self.decisions.len());

            self.state.new_checkpoint();
            self.decisions.push(decision);
            self.statistics.peak_depth =
                self.statistics.peak_depth.max(self.decisions.len() as u64);

            if let Err(conflict) = self.apply(decision) {
                self.record_failure(conflict);
                if !self.backtrack() {
                    return SearchOutcome::Exhausted;
                }
            }
        }
    }

    /// The decision of the brancher; once it runs out while some domain is still unfixed, the
    /// first unfixed domain is assigned its minimum.
    fn next_decision(&mut self) -> Option<Predicate> {
        let mut context =
            SelectionContext::new(&self.state.assignments, &mut *self.random_generator);
        if let Some(decision) = self.brancher.next_decision(&mut context) {
            return Some(decision);
        }

        let domain = self.state.first_unfixed_domain()?;
        let value = self.state.lower_bound(&domain);
        Some(predicate!(domain == value))
    }

    fn apply(&mut self, predicate: Predicate) -> PropagationStatusCP {
        let _ = self.state.post(predicate)?;
        self.state.propagate_to_fixed_point()
    }

    fn record_failure(&mut self, conflict: Conflict) {
        trace!("conflict at depth {}: {conflict}", self.decisions.len());
        self.statistics.num_failures += 1;
        self.termination.failure_has_occurred();
        self.brancher.on_conflict();
    }

    /// Pops decisions until the refutation of one of them propagates without a conflict.
    /// Returns `false` when no decision is left to refute.
    fn backtrack(&mut self) -> bool {
        while let Some(decision) = self.decisions.pop() {
            self.state.restore_to(self.base + self.decisions.len());
            self.statistics.num_backtracks += 1;
            trace!("refuting {decision} at depth {}", self.decisions.len());

            match self.apply(!decision) {
                Ok(()) => return true,
                Err(conflict) => self.record_failure(conflict),
            }
        }

        false
    }
}

use crate::basic_types::Solution;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;

/// A trait for definining a branching strategy.
///
/// The search applies the returned [`Predicate`] in the left branch and its negation in the
/// right branch. A brancher returns [`None`] when it has nothing left to decide.
pub trait Brancher {
    /// Returns the next decision concerning a single variable and value, or [`None`] if all the
    /// variables the brancher covers are fixed.
    ///
    /// The returned predicate should not hold yet; a decision which does not change the domains
    /// wastes a search node.
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Predicate>;

    /// Called when the search encounters a failed node.
    fn on_conflict(&mut self) {}

    /// Called when a new solution has been found.
    fn on_solution(&mut self, _solution: &Solution) {}
}

impl<B: Brancher + ?Sized> Brancher for &mut B {
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Predicate> {
        (**self).next_decision(context)
    }

    fn on_conflict(&mut self) {
        (**self).on_conflict();
    }

    fn on_solution(&mut self, solution: &Solution) {
        (**self).on_solution(solution);
    }
}

impl<B: Brancher + ?Sized> Brancher for Box<B> {
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Predicate> {
        (**self).next_decision(context)
    }

    fn on_conflict(&mut self) {
        (**self).on_conflict();
    }

    fn on_solution(&mut self, solution: &Solution) {
        (**self).on_solution(solution);
    }
}

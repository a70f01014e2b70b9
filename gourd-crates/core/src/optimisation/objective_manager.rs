use log::debug;

use super::OptimisationDirection;
use super::ResolutionPolicy;
use crate::basic_types::ConfigurationError;
use crate::basic_types::Solution;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::gourd_assert_simple;
use crate::predicate;

/// Keeps track of the objective of a solving session: the [`ResolutionPolicy`], the objective
/// variable and the best objective value known so far.
///
/// For [`ResolutionPolicy::Satisfy`] the manager is a pass-through which never restricts the
/// search.
#[derive(Debug, Clone)]
pub struct ObjectiveManager {
    policy: ResolutionPolicy,
    objective: Option<DomainId>,
    best_value: Option<i32>,
}

impl ObjectiveManager {
    /// Fails with [`ConfigurationError::MissingObjective`] when minimising or maximising without
    /// an objective variable.
    pub fn new(
        policy: ResolutionPolicy,
        objective: Option<DomainId>,
    ) -> Result<ObjectiveManager, ConfigurationError> {
        if policy != ResolutionPolicy::Satisfy && objective.is_none() {
            return Err(ConfigurationError::MissingObjective);
        }

        Ok(ObjectiveManager {
            policy,
            objective,
            best_value: None,
        })
    }

    pub fn satisfaction() -> ObjectiveManager {
        ObjectiveManager {
            policy: ResolutionPolicy::Satisfy,
            objective: None,
            best_value: None,
        }
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    pub fn objective(&self) -> Option<DomainId> {
        self.objective
    }

    /// The best objective value known, either from a solution of this session or published by
    /// another worker.
    pub fn best_value(&self) -> Option<i32> {
        self.best_value
    }

    pub fn is_optimising(&self) -> bool {
        self.policy.direction().is_some()
    }

    /// Whether `value` is strictly better than the best value known; every value improves on
    /// nothing, and nothing improves anything when merely satisfying.
    pub fn is_improving(&self, value: i32) -> bool {
        match (self.policy.direction(), self.best_value) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(direction), Some(best)) => direction.is_improvement(value, best),
        }
    }

    /// Records the objective value of `solution` and returns it; [`None`] when satisfying.
    ///
    /// The solution has to be strictly better than the best value known, which is what the
    /// objective cut enforces.
    pub fn on_solution(&mut self, solution: &Solution) -> Option<i32> {
        let objective = self.objective?;
        if !self.is_optimising() {
            return None;
        }

        let value = solution.get_value(objective);
        gourd_assert_simple!(
            self.is_improving(value),
            "solution with objective {value} does not improve on {:?}",
            self.best_value
        );
        debug!("new best objective value {value}");
        self.best_value = Some(value);

        Some(value)
    }

    /// Adopts a bound found elsewhere if it improves on the best value known. Returns whether
    /// it did.
    pub fn improve_bound(&mut self, value: i32) -> bool {
        if !self.is_improving(value) {
            return false;
        }

        self.best_value = Some(value);
        true
    }

    /// The predicate every further solution has to satisfy, if there is a best value to beat.
    pub fn cut(&self) -> Option<Predicate> {
        let objective = self.objective?;
        let best = self.best_value?;

        match self.policy.direction()? {
            OptimisationDirection::Minimise => {
                Some(predicate!(objective <= best.saturating_sub(1)))
            }
            OptimisationDirection::Maximise => {
                Some(predicate!(objective >= best.saturating_add(1)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cp::Assignments;

    fn solution_with_value(value: i32) -> (Solution, DomainId) {
        let mut assignments = Assignments::default();
        let objective = assignments.grow(value, value, None);
        (Solution::new(&assignments), objective)
    }

    #[test]
    fn optimising_without_objective_is_a_configuration_error() {
        assert_eq!(
            ObjectiveManager::new(ResolutionPolicy::Minimise, None).unwrap_err(),
            ConfigurationError::MissingObjective
        );
        assert!(ObjectiveManager::new(ResolutionPolicy::Satisfy, None).is_ok());
    }

    #[test]
    fn minimising_cut_follows_best_solution() {
        let (solution, objective) = solution_with_value(7);
        let mut manager =
            ObjectiveManager::new(ResolutionPolicy::Minimise, Some(objective)).unwrap();
        assert_eq!(manager.cut(), None);

        assert_eq!(manager.on_solution(&solution), Some(7));

        assert_eq!(manager.cut(), Some(predicate!(objective <= 6)));
        assert!(manager.is_improving(6));
        assert!(!manager.is_improving(7));
    }

    #[test]
    fn maximising_adopts_only_improving_bounds() {
        let (_, objective) = solution_with_value(0);
        let mut manager =
            ObjectiveManager::new(ResolutionPolicy::Maximise, Some(objective)).unwrap();

        assert!(manager.improve_bound(3));
        assert!(!manager.improve_bound(2));

        assert_eq!(manager.best_value(), Some(3));
        assert_eq!(manager.cut(), Some(predicate!(objective >= 4)));
    }

    #[test]
    fn satisfaction_never_cuts() {
        let (solution, _) = solution_with_value(4);
        let mut manager = ObjectiveManager::satisfaction();

        assert_eq!(manager.on_solution(&solution), None);
        assert!(!manager.is_improving(1));
        assert_eq!(manager.cut(), None);
    }
}

use rand::Rng;

use crate::branching::value_selection::ValueSelector;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::predicate;

/// A [`ValueSelector`] which assigns a value drawn uniformly from the domain, using the random
/// generator of the solver.
///
/// A domain which only keeps track of its bounds cannot exclude a value from its inside, so it
/// is split at the drawn value (`x <= v`) instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct InDomainRandom;

impl ValueSelector<DomainId> for InDomainRandom {
    fn select_value(
        &mut self,
        context: &mut SelectionContext,
        decision_variable: DomainId,
    ) -> Predicate {
        let values_in_domain = context
            .iterate_domain(decision_variable)
            .collect::<Vec<_>>();
        let random_index = context.random().gen_range(0..values_in_domain.len());
        let value = values_in_domain[random_index];

        if context.has_holes(decision_variable)
            || value == context.lower_bound(decision_variable)
            || value == context.upper_bound(decision_variable)
        {
            predicate!(decision_variable == value)
        } else {
            predicate!(decision_variable <= value)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::engine::cp::Assignments;

    #[test]
    fn selected_value_is_in_the_domain() {
        let mut assignments = SelectionContext::create_for_testing(vec![(0, 10)]);
        let domain = assignments.get_domains().next().unwrap();
        let _ = assignments.remove_interval_from_domain(domain, 2, 8).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..20 {
            let mut context = SelectionContext::new(&assignments, &mut rng);
            let selected = InDomainRandom.select_value(&mut context, domain);

            assert_eq!(selected.get_domain(), domain);
            assert!([0, 1, 9, 10].contains(&selected.get_right_hand_side()));
        }
    }

    #[test]
    fn bounded_domains_are_split_at_inner_values() {
        let mut assignments = Assignments::default();
        let domain = assignments.grow(0, 10, None);
        let mut rng = SmallRng::seed_from_u64(11);

        for _ in 0..20 {
            let mut context = SelectionContext::new(&assignments, &mut rng);
            let selected = InDomainRandom.select_value(&mut context, domain);

            let value = selected.get_right_hand_side();
            if value == 0 || value == 10 {
                assert!(selected.is_equality_predicate());
            } else {
                assert!(selected.is_upper_bound_predicate());
            }
        }
    }
}

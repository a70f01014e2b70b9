use crate::containers::KeyedVec;
use crate::engine::cp::Assignments;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::gourd_assert_simple;

/// A read-only snapshot of the value of every domain at the moment a solution was accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    values: KeyedVec<DomainId, i32>,
}

impl Solution {
    /// Records the current assignment. Every domain has to be fixed.
    pub(crate) fn new(assignments: &Assignments) -> Solution {
        let mut values = KeyedVec::default();

        for domain in assignments.get_domains() {
            gourd_assert_simple!(
                assignments.is_domain_assigned(domain),
                "A solution requires every domain to be assigned, {domain} is not."
            );
            let _ = values.push(assignments.get_lower_bound(domain));
        }

        Solution { values }
    }

    pub fn num_domains(&self) -> usize {
        self.values.len()
    }

    pub fn get_value(&self, domain: DomainId) -> i32 {
        self.values[domain]
    }

    /// The value of any [`IntegerVariable`] (domain or constant) in this solution.
    pub fn get_integer_value<Var: IntegerVariable>(&self, variable: Var) -> i32 {
        variable.value_in(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DomainId, i32)> + '_ {
        self.values
            .enumerate()
            .map(|(domain, &value)| (domain, value))
    }
}

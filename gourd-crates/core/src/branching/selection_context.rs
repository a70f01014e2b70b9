use rand::rngs::SmallRng;

use crate::engine::cp::Assignments;
use crate::engine::cp::IntegerDomainIterator;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;

/// The read-only view on the domains given to a [`crate::branching::Brancher`], together with
/// the random generator of the solver.
#[derive(Debug)]
pub struct SelectionContext<'a> {
    assignments: &'a Assignments,
    random_generator: &'a mut SmallRng,
}

impl<'a> SelectionContext<'a> {
    pub(crate) fn new(assignments: &'a Assignments, random_generator: &'a mut SmallRng) -> Self {
        SelectionContext {
            assignments,
            random_generator,
        }
    }

    pub fn random(&mut self) -> &mut SmallRng {
        self.random_generator
    }

    /// The number of values in the domain of the variable.
    pub fn get_size_of_domain<Var: IntegerVariable>(&self, var: Var) -> u32 {
        var.size(self.assignments)
    }

    pub fn lower_bound<Var: IntegerVariable>(&self, var: Var) -> i32 {
        var.lower_bound(self.assignments)
    }

    pub fn upper_bound<Var: IntegerVariable>(&self, var: Var) -> i32 {
        var.upper_bound(self.assignments)
    }

    pub fn contains<Var: IntegerVariable>(&self, var: Var, value: i32) -> bool {
        var.contains(self.assignments, value)
    }

    pub fn is_integer_fixed<Var: IntegerVariable>(&self, var: Var) -> bool {
        var.is_fixed(self.assignments)
    }

    pub fn iterate_domain<Var: IntegerVariable>(&self, var: Var) -> IntegerDomainIterator<'a> {
        var.iterate_domain(self.assignments)
    }

    /// Whether values can be removed from the inside of the domain, rather than only from its
    /// bounds.
    pub fn has_holes(&self, domain: DomainId) -> bool {
        self.assignments.is_enumerated(domain)
    }

    /// All the domains of the solver, in creation order.
    pub fn get_domains(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.assignments.get_domains()
    }

    #[cfg(test)]
    pub(crate) fn create_for_testing(domains: Vec<(i32, i32)>) -> Assignments {
        let mut assignments = Assignments::default();
        for (lower_bound, upper_bound) in domains {
            let _ = assignments.grow_enumerated((lower_bound..=upper_bound).collect(), None);
        }
        assignments
    }
}

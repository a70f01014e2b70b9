use super::predicate::Predicate;
use super::predicate::PredicateType;
use crate::engine::variables::DomainId;

/// Creates the four kinds of [`Predicate`] over a variable; used by the [`predicate!`](crate::predicate) macro.
pub trait PredicateConstructor {
    /// `[x >= bound]`
    fn lower_bound_predicate(&self, bound: i32) -> Predicate;

    /// `[x <= bound]`
    fn upper_bound_predicate(&self, bound: i32) -> Predicate;

    /// `[x == value]`
    fn equality_predicate(&self, value: i32) -> Predicate;

    /// `[x != value]`
    fn disequality_predicate(&self, value: i32) -> Predicate;
}

impl PredicateConstructor for DomainId {
    fn lower_bound_predicate(&self, bound: i32) -> Predicate {
        Predicate::new(*self, PredicateType::LowerBound, bound)
    }

    fn upper_bound_predicate(&self, bound: i32) -> Predicate {
        Predicate::new(*self, PredicateType::UpperBound, bound)
    }

    fn equality_predicate(&self, value: i32) -> Predicate {
        Predicate::new(*self, PredicateType::Equal, value)
    }

    fn disequality_predicate(&self, value: i32) -> Predicate {
        Predicate::new(*self, PredicateType::NotEqual, value)
    }
}

/// Builds a [`Predicate`] from a comparison between a variable and a value.
///
/// The variable may be a plain identifier, a field access or an indexed element.
///
/// # Example
/// ```rust
/// # use gourd_core::Solver;
/// # use gourd_core::predicate;
/// let mut solver = Solver::default();
/// let x = solver.new_bounded_integer(0, 10);
///
/// let lower_bound_predicate = predicate!(x >= 5);
/// assert_eq!(lower_bound_predicate.get_domain(), x);
/// assert_eq!(lower_bound_predicate.get_right_hand_side(), 5);
///
/// let disequality_predicate = predicate!(x != 5);
/// assert!(disequality_predicate.is_not_equal_predicate());
/// ```
#[macro_export]
macro_rules! predicate {
    ($($var:ident).+$([$index:expr])? >= $bound:expr) => {{
        #[allow(unused, reason = "could be imported at call-site")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.lower_bound_predicate($bound)
    }};
    ($($var:ident).+$([$index:expr])? <= $bound:expr) => {{
        #[allow(unused, reason = "could be imported at call-site")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.upper_bound_predicate($bound)
    }};
    ($($var:ident).+$([$index:expr])? == $value:expr) => {{
        #[allow(unused, reason = "could be imported at call-site")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.equality_predicate($value)
    }};
    ($($var:ident).+$([$index:expr])? != $value:expr) => {{
        #[allow(unused, reason = "could be imported at call-site")]
        use $crate::predicates::PredicateConstructor;
        $($var).+$([$index])?.disequality_predicate($value)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_local_identifiers_are_matched() {
        let x = DomainId::new(0);

        assert_eq!(x, predicate![x >= 2].get_domain());
        assert_eq!(3, predicate![x <= 3].get_right_hand_side());
        assert!(predicate!(x >= 2).is_lower_bound_predicate());
        assert!(predicate!(x <= 3).is_upper_bound_predicate());
        assert!(predicate!(x == 5).is_equality_predicate());
        assert!(predicate!(x != 5).is_not_equal_predicate());
    }

    #[test]
    fn macro_indexed_identifiers_are_matched() {
        let variables = [DomainId::new(4), DomainId::new(7)];

        assert_eq!(variables[1], predicate![variables[1] == 2].get_domain());
        assert_eq!(variables[0], predicate![variables[0] != 1].get_domain());
    }
}

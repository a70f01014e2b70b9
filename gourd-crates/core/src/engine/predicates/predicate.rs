use crate::engine::variables::DomainId;
use crate::predicate;

/// An atomic domain operation: a ([`DomainId`], [`PredicateType`], value) triple such as
/// `[x >= 3]` or `[x != 5]`.
///
/// Search decisions are predicates; the refutation of a decision is its negation (`!predicate`).
/// To create a [`Predicate`], use [`Predicate::new`] or the more concise [`predicate!`] macro.
#[derive(Clone, PartialEq, Eq, Copy, Hash)]
pub struct Predicate {
    domain: DomainId,
    predicate_type: PredicateType,
    value: i32,
}

/// The operator of a [`Predicate`].
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash)]
pub enum PredicateType {
    /// Tighten the lower bound.
    LowerBound,
    /// Tighten the upper bound.
    UpperBound,
    /// Remove a value.
    NotEqual,
    /// Assign a value.
    Equal,
}

impl Predicate {
    pub fn new(domain: DomainId, predicate_type: PredicateType, value: i32) -> Self {
        Self {
            domain,
            predicate_type,
            value,
        }
    }

    pub fn get_predicate_type(&self) -> PredicateType {
        self.predicate_type
    }

    /// Returns the [`DomainId`] of the [`Predicate`]
    pub fn get_domain(&self) -> DomainId {
        self.domain
    }

    pub fn get_right_hand_side(&self) -> i32 {
        self.value
    }

    pub fn is_equality_predicate(&self) -> bool {
        self.predicate_type == PredicateType::Equal
    }

    pub fn is_lower_bound_predicate(&self) -> bool {
        self.predicate_type == PredicateType::LowerBound
    }

    pub fn is_upper_bound_predicate(&self) -> bool {
        self.predicate_type == PredicateType::UpperBound
    }

    pub fn is_not_equal_predicate(&self) -> bool {
        self.predicate_type == PredicateType::NotEqual
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        let domain = self.domain;
        let value = self.value;

        match self.predicate_type {
            PredicateType::LowerBound => predicate!(domain <= value - 1),
            PredicateType::UpperBound => predicate!(domain >= value + 1),
            PredicateType::NotEqual => predicate!(domain == value),
            PredicateType::Equal => predicate!(domain != value),
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let domain = self.domain;
        let rhs = self.value;

        match self.predicate_type {
            PredicateType::LowerBound => write!(f, "[{domain} >= {rhs}]"),
            PredicateType::UpperBound => write!(f, "[{domain} <= {rhs}]"),
            PredicateType::NotEqual => write!(f, "[{domain} != {rhs}]"),
            PredicateType::Equal => write!(f, "[{domain} == {rhs}]"),
        }
    }
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use crate::predicate;
    use crate::variables::DomainId;

    #[test]
    fn negation_is_the_refutation() {
        let x = DomainId::new(0);

        assert_eq!(!predicate!(x >= 5), predicate!(x <= 4));
        assert_eq!(!predicate!(x <= 5), predicate!(x >= 6));
        assert_eq!(!predicate!(x == 5), predicate!(x != 5));
        assert_eq!(!predicate!(x != 5), predicate!(x == 5));
    }

    #[test]
    fn double_negation_is_identity() {
        let x = DomainId::new(3);
        let decision = predicate!(x == 2);

        assert_eq!(!!decision, decision);
    }

    #[test]
    fn predicates_are_displayed_with_their_domain() {
        let x = DomainId::new(1);

        assert_eq!(predicate!(x >= 2).to_string(), "[x1 >= 2]");
        assert_eq!(predicate!(x != -4).to_string(), "[x1 != -4]");
    }
}

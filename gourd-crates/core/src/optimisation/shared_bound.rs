use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use super::OptimisationDirection;

/// The best objective value found by any worker of a portfolio.
///
/// Workers publish the value of every solution they find and poll the bound once per search
/// node; only scalars are exchanged, never domains.
#[derive(Debug)]
pub struct SharedBound {
    direction: OptimisationDirection,
    best: AtomicI64,
}

impl SharedBound {
    pub fn new(direction: OptimisationDirection) -> SharedBound {
        SharedBound {
            direction,
            best: AtomicI64::new(Self::sentinel(direction)),
        }
    }

    fn sentinel(direction: OptimisationDirection) -> i64 {
        match direction {
            OptimisationDirection::Minimise => i64::MAX,
            OptimisationDirection::Maximise => i64::MIN,
        }
    }

    pub fn direction(&self) -> OptimisationDirection {
        self.direction
    }

    /// Publishes an objective value; returns whether it improved on the shared bound.
    pub fn publish(&self, value: i32) -> bool {
        let value = i64::from(value);
        let previous = match self.direction {
            OptimisationDirection::Minimise => self.best.fetch_min(value, Ordering::AcqRel),
            OptimisationDirection::Maximise => self.best.fetch_max(value, Ordering::AcqRel),
        };

        match self.direction {
            OptimisationDirection::Minimise => value < previous,
            OptimisationDirection::Maximise => value > previous,
        }
    }

    /// The best value published so far.
    pub fn get(&self) -> Option<i32> {
        let best = self.best.load(Ordering::Acquire);
        if best == Self::sentinel(self.direction) {
            None
        } else {
            i32::try_from(best).ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimising_bound_keeps_the_smallest_value() {
        let bound = SharedBound::new(OptimisationDirection::Minimise);
        assert_eq!(bound.get(), None);

        assert!(bound.publish(8));
        assert!(!bound.publish(9));
        assert!(bound.publish(3));

        assert_eq!(bound.get(), Some(3));
    }

    #[test]
    fn maximising_bound_keeps_the_largest_value() {
        let bound = SharedBound::new(OptimisationDirection::Maximise);

        assert!(bound.publish(-4));
        assert!(!bound.publish(-4));
        assert!(bound.publish(2));

        assert_eq!(bound.get(), Some(2));
    }
}

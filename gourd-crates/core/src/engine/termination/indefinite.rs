use super::TerminationCondition;

/// A [`TerminationCondition`] which never triggers; the search runs until it is complete.
#[derive(Clone, Copy, Debug, Default)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use super::TerminationCondition;

/// A [`TerminationCondition`] which triggers once a shared flag is raised, typically by
/// another worker of a portfolio which completed its search.
#[derive(Clone, Copy, Debug)]
pub struct StopFlag<'a> {
    flag: &'a AtomicBool,
}

impl<'a> StopFlag<'a> {
    pub fn new(flag: &'a AtomicBool) -> Self {
        StopFlag { flag }
    }

    /// Raise the flag, stopping every search polling it.
    pub fn raise(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

impl TerminationCondition for StopFlag<'_> {
    fn should_stop(&mut self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

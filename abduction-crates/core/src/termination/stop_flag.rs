use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::TerminationCondition;

/// A [`TerminationCondition`] backed by a shared flag, which can be raised from another thread or
/// from a signal handler.
#[derive(Clone, Debug, Default)]
pub struct StopFlag {
    raised: Arc<AtomicBool>,
}

impl StopFlag {
    pub fn new() -> StopFlag {
        StopFlag::default()
    }

    /// The shared flag; storing `true` in it stops the solver at its next poll.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.raised)
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::Relaxed);
    }
}

impl TerminationCondition for StopFlag {
    fn should_stop(&mut self) -> bool {
        self.raised.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raising_a_clone_stops_the_original() {
        let mut condition = StopFlag::new();
        let remote = condition.clone();
        assert!(!condition.should_stop());

        remote.raise();
        assert!(condition.should_stop());
    }
}

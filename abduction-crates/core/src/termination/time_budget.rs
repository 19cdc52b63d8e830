use std::time::Duration;
use std::time::Instant;

use super::TerminationCondition;

/// Stops the search once the configured timeout of a run has expired.
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    /// `None` when the budget is too large to be represented as an [`Instant`].
    deadline: Option<Instant>,
}

impl TimeBudget {
    /// A budget of `budget`, measured from the moment of the call.
    pub fn starting_now(budget: Duration) -> TimeBudget {
        TimeBudget {
            deadline: Instant::now().checked_add(budget),
        }
    }
}

impl TerminationCondition for TimeBudget {
    fn should_stop(&mut self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_budget_stops_immediately() {
        let mut budget = TimeBudget::starting_now(Duration::ZERO);
        assert!(budget.should_stop());
    }

    #[test]
    fn large_budget_does_not_stop() {
        let mut budget = TimeBudget::starting_now(Duration::from_secs(3600));
        assert!(!budget.should_stop());
    }

    #[test]
    fn unrepresentable_budget_never_stops() {
        let mut budget = TimeBudget::starting_now(Duration::MAX);
        assert!(!budget.should_stop());
    }
}

//! Reporting of progress and of explanations while the solver runs.

use std::time::Duration;

use crate::basic_types::Explanation;

/// Receives the progress of a run as a percentage together with a human readable message.
pub trait ProgressSink {
    fn update_progress(&mut self, percentage: f64, message: &str);
}

impl<T: FnMut(f64, &str)> ProgressSink for T {
    fn update_progress(&mut self, percentage: f64, message: &str) {
        (self)(percentage, message)
    }
}

impl<T: ProgressSink> ProgressSink for Option<T> {
    fn update_progress(&mut self, percentage: f64, message: &str) {
        if let Some(sink) = self {
            sink.update_progress(percentage, message);
        }
    }
}

impl ProgressSink for () {
    fn update_progress(&mut self, _: f64, _: &str) {}
}

/// Receives every explanation at the moment the solver accepts it.
///
/// Accepted explanations can still be removed by the final filtering; the definitive set is the
/// one in the [`AbductionReport`](crate::AbductionReport).
pub trait ExplanationSink {
    fn explanation_found(&mut self, explanation: &Explanation);

    /// Called whenever the search finishes a depth of the tree.
    fn level_finished(&mut self) {}
}

impl<T: FnMut(&Explanation)> ExplanationSink for T {
    fn explanation_found(&mut self, explanation: &Explanation) {
        (self)(explanation)
    }
}

impl<T: ExplanationSink> ExplanationSink for Option<T> {
    fn explanation_found(&mut self, explanation: &Explanation) {
        if let Some(sink) = self {
            sink.explanation_found(explanation);
        }
    }

    fn level_finished(&mut self) {
        if let Some(sink) = self {
            sink.level_finished();
        }
    }
}

impl ExplanationSink for () {
    fn explanation_found(&mut self, _: &Explanation) {}
}

/// Turns finished tree depths and elapsed time into a percentage.
///
/// With a depth limit `d`, finishing depth `k` fills `1 / 3^(d - k - 1)` of the remaining
/// percentage. Without a depth limit but with a timeout, the percentage is the fraction of the
/// time budget which was used. The tracker never reports more than 99 percent before the run
/// ends.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ProgressTracker {
    percentage: f64,
    depth_limit: Option<usize>,
    timeout: Option<Duration>,
}

pub(crate) const MAXIMUM_RUNNING_PERCENTAGE: f64 = 99.0;

impl ProgressTracker {
    pub(crate) fn new(depth_limit: Option<usize>, timeout: Option<Duration>) -> ProgressTracker {
        ProgressTracker {
            percentage: 0.0,
            depth_limit: depth_limit.filter(|&limit| limit > 0),
            timeout,
        }
    }

    /// Whether progress is measured in time rather than in tree depth.
    pub(crate) fn is_time_based(&self) -> bool {
        self.depth_limit.is_none() && self.timeout.is_some()
    }

    /// Computes the progress after `depth` has been fully explored at `elapsed_seconds`.
    pub(crate) fn depth_finished(&mut self, depth: usize, elapsed_seconds: f64) -> (f64, String) {
        if let Some(limit) = self.depth_limit {
            let remaining = MAXIMUM_RUNNING_PERCENTAGE - self.percentage;
            let exponent = limit as i32 - depth as i32 - 1;
            self.percentage += remaining / 3_f64.powi(exponent);
        } else if let Some(timeout) = self.timeout {
            return self.time_passed(timeout, elapsed_seconds);
        }

        self.percentage = self.percentage.min(MAXIMUM_RUNNING_PERCENTAGE);
        (self.percentage, format!("Finished tree depth: {depth}"))
    }

    /// Computes the progress of a time-limited run at `elapsed_seconds`.
    pub(crate) fn time_elapsed(&mut self, elapsed_seconds: f64) -> Option<(f64, String)> {
        let timeout = self.timeout?;
        Some(self.time_passed(timeout, elapsed_seconds))
    }

    fn time_passed(&mut self, timeout: Duration, elapsed_seconds: f64) -> (f64, String) {
        let budget = timeout.as_secs_f64();
        self.percentage = if budget > 0.0 {
            (elapsed_seconds / budget * MAXIMUM_RUNNING_PERCENTAGE).min(MAXIMUM_RUNNING_PERCENTAGE)
        } else {
            MAXIMUM_RUNNING_PERCENTAGE
        };

        let left = (budget - elapsed_seconds).max(0.0);
        (self.percentage, format!("Seconds left until time-out: {left:.2}"))
    }
}

use crate::oracle::OracleError;
use crate::results::AbductionReport;

/// The errors which can occur while setting up or running the solver.
#[derive(Debug, thiserror::Error)]
pub enum AbductionError {
    #[error("the consistency oracle failed: {0}")]
    Oracle(#[from] OracleError),
    #[error("the observation must contain at least one axiom")]
    EmptyObservation,
}

/// A failed solver run.
///
/// The error is raised only after the explanations found so far have been post-processed and
/// logged; they are available through [`SolveError::partial_report`].
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct SolveError {
    #[source]
    error: AbductionError,
    partial_report: Box<AbductionReport>,
}

impl SolveError {
    pub(crate) fn new(error: AbductionError, partial_report: AbductionReport) -> SolveError {
        SolveError {
            error,
            partial_report: Box::new(partial_report),
        }
    }

    pub fn error(&self) -> &AbductionError {
        &self.error
    }

    pub fn partial_report(&self) -> &AbductionReport {
        &self.partial_report
    }

    pub fn into_parts(self) -> (AbductionError, AbductionReport) {
        (self.error, *self.partial_report)
    }
}

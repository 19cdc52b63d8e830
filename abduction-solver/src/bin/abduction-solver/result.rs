use std::fmt::Display;

use abduction_solver::core::SolveError;
use abduction_solver::InstanceError;
use thiserror::Error;

pub(crate) type AbductionCliResult<T> = Result<T, AbductionCliError>;

#[derive(Error, Debug)]
pub(crate) enum AbductionCliError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The file {0} is not supported.")]
    InvalidInstanceFile(String),
    #[error("Failed to load the knowledge base, more details: {0}")]
    Instance(#[from] InstanceError),
    #[error("The search was aborted, more details: {0}")]
    Solve(#[from] SolveError),
}

impl AbductionCliError {
    pub(crate) fn invalid_instance(path: impl Display) -> Self {
        Self::InvalidInstanceFile(format!("{path}"))
    }
}

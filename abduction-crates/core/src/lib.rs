//! The core of the abduction solver: given a knowledge base, an observation which it does not
//! entail and a set of abducible axioms, [`HybridSolver`] finds every minimal set of abducibles
//! which, added to the knowledge base, entails the observation.
//!
//! The solver never reasons about the knowledge base itself; it asks a [`ConsistencyOracle`]
//! whether sets of axioms are consistent. The problem is described by a [`Loader`].
pub(crate) mod basic_types;
pub(crate) mod engine;
pub(crate) mod error;
pub(crate) mod explanations;
pub(crate) mod loader;
pub(crate) mod options;
pub(crate) mod oracle;
pub(crate) mod progress;
pub(crate) mod results;

pub mod monitor;
pub mod statistics;
pub mod termination;

#[cfg(test)]
pub(crate) mod test_oracle;

pub use convert_case;

pub use crate::basic_types::Axiom;
pub use crate::basic_types::AxiomSet;
pub use crate::basic_types::Explanation;
pub use crate::basic_types::Observation;
pub use crate::engine::HybridSolver;
pub use crate::engine::SearchStatistics;
pub use crate::error::AbductionError;
pub use crate::error::SolveError;
pub use crate::loader::Abducibles;
pub use crate::loader::AbductionInput;
pub use crate::loader::Loader;
pub use crate::options::ConflictCachingHeuristic;
pub use crate::options::SearchStrategy;
pub use crate::options::SolverOptions;
pub use crate::oracle::ConsistencyOracle;
pub use crate::oracle::OracleError;
pub use crate::progress::ExplanationSink;
pub use crate::progress::ProgressSink;
pub use crate::results::AbductionReport;
pub use crate::results::AbductionStatus;

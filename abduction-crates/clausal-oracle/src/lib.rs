//! A [`ConsistencyOracle`](abduction_core::ConsistencyOracle) for knowledge bases written in the
//! rule language of [`abduction_format`].
//!
//! The rules are instantiated over the individuals of the knowledge base, which turns every
//! consistency question into a propositional satisfiability problem. See [`ClausalOracle`].
mod atoms;
mod dpll;
mod grounding;
mod oracle;

pub use grounding::ground_axiom;
pub use oracle::ClausalOracle;
pub use oracle::OracleStatistics;

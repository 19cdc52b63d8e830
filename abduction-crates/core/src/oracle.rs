//! The interface to the logical reasoner which decides consistency.
//!
//! The solver never reasons about the knowledge base itself; every question it asks goes through
//! a [`ConsistencyOracle`].

use crate::basic_types::Axiom;

/// The errors which a [`ConsistencyOracle`] can report.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("the oracle exceeded its limit of {limit} decisions")]
    ResourceLimit { limit: u64 },
    #[error("the oracle cannot interpret axiom {0}")]
    UnsupportedAxiom(String),
    #[error("consistency check failed: {0}")]
    Other(String),
}

/// Decides whether sets of axioms are consistent with a fixed knowledge base.
///
/// The oracle is constructed over the knowledge base together with the negated observation; this
/// is what [`ConsistencyOracle::reset_to_original`] returns to. Axioms added through
/// [`ConsistencyOracle::add_axiom`] are transient: they take part in every subsequent
/// [`ConsistencyOracle::is_consistent`] call until the next reset.
pub trait ConsistencyOracle {
    /// Adds an axiom to the transient part of the oracle.
    fn add_axiom(&mut self, axiom: &Axiom);

    /// Adds all the given axioms to the transient part of the oracle.
    fn add_axioms<'a>(&mut self, axioms: impl IntoIterator<Item = &'a Axiom>)
    where
        Self: Sized,
    {
        for axiom in axioms {
            self.add_axiom(axiom);
        }
    }

    /// Removes all transient axioms.
    fn reset_to_original(&mut self);

    /// Whether the knowledge base, the negated observation and the transient axioms are jointly
    /// consistent.
    ///
    /// When this returns `Ok(true)`, [`ConsistencyOracle::holds_in_model`] answers questions
    /// about the model which witnesses the consistency.
    fn is_consistent(&mut self) -> Result<bool, OracleError>;

    /// Whether the knowledge base, *without* the negated observation, is consistent with
    /// `axioms`.
    ///
    /// This must not change the transient axioms nor the model.
    fn is_consistent_with_background(&mut self, axioms: &[Axiom]) -> Result<bool, OracleError>;

    /// Whether `axiom` is true in the model found by the last successful consistency check.
    fn holds_in_model(&self, axiom: &Axiom) -> bool;
}

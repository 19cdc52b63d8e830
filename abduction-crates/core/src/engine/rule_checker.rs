use crate::basic_types::AxiomSet;
use crate::basic_types::Explanation;
use crate::basic_types::Observation;
use crate::oracle::ConsistencyOracle;
use crate::oracle::OracleError;

/// The pruning rules which every candidate explanation has to pass.
#[derive(Clone, Debug)]
pub(crate) struct RuleChecker {
    observation: Observation,
    strict_relevance: bool,
}

impl RuleChecker {
    pub(crate) fn new(observation: Observation, strict_relevance: bool) -> RuleChecker {
        RuleChecker {
            observation,
            strict_relevance,
        }
    }

    /// Whether no known explanation is contained in `candidate`.
    pub(crate) fn is_minimal(explanations: &[Explanation], candidate: &AxiomSet) -> bool {
        explanations
            .iter()
            .all(|explanation| !explanation.axioms().is_subset(candidate))
    }

    /// Whether `candidate` is free of clashes and, under strict relevance, does not assume any
    /// component of the observation.
    pub(crate) fn is_relevant(&self, candidate: &AxiomSet) -> bool {
        if !Self::is_clash_free(candidate) {
            return false;
        }

        !self.strict_relevance
            || self
                .observation
                .components()
                .iter()
                .all(|component| !candidate.contains(component))
    }

    /// Whether `candidate` contains no axiom together with its complement.
    pub(crate) fn is_clash_free(candidate: &AxiomSet) -> bool {
        candidate.len() <= 1 || !candidate.contains_clash()
    }

    /// Whether the knowledge base without the negated observation admits `candidate`.
    pub(crate) fn is_consistent<Oracle: ConsistencyOracle>(
        oracle: &mut Oracle,
        candidate: &AxiomSet,
    ) -> Result<bool, OracleError> {
        oracle.is_consistent_with_background(&candidate.to_sorted_vec())
    }
}

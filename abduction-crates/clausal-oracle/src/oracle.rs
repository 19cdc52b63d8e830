use std::sync::Arc;

use abduction_core::create_statistics_struct;
use abduction_core::Axiom;
use abduction_core::ConsistencyOracle;
use abduction_core::Observation;
use abduction_core::OracleError;
use abduction_format::KnowledgeBaseDocument;
use log::debug;

use crate::atoms::AtomTable;
use crate::atoms::ClauseLiteral;
use crate::dpll::Dpll;
use crate::grounding::ground_axiom;
use crate::grounding::ground_rule;
use crate::grounding::to_arc;

create_statistics_struct!(
    /// Counters of the work done by a [`ClausalOracle`].
    OracleStatistics {
        /// The number of satisfiability checks
        satisfiability_checks: u64,
        /// The number of decisions over all checks
        decisions: u64,
        /// The number of ground clauses of the knowledge base
        ground_clauses: u64,
});

/// A [`ConsistencyOracle`] which decides consistency on the ground instantiation of a rule-based
/// knowledge base.
///
/// Every rule is instantiated over the individuals of the knowledge base, after which the
/// resulting clauses are checked with a DPLL search. The model of a successful check assigns
/// `false` to every atom which the clauses do not force to be true.
#[derive(Debug)]
pub struct ClausalOracle {
    atoms: AtomTable,
    background: Vec<Vec<ClauseLiteral>>,
    /// The disjunction of the complements of the observation components.
    negated_observation: Vec<ClauseLiteral>,
    transient: Vec<ClauseLiteral>,
    model: Vec<bool>,
    decision_limit: Option<u64>,
    statistics: OracleStatistics,
}

impl ClausalOracle {
    /// Creates an oracle over the given ground clauses and observation.
    pub fn new(
        background: impl IntoIterator<Item = Vec<Axiom>>,
        observation: &Observation,
    ) -> ClausalOracle {
        let mut atoms = AtomTable::default();

        let background: Vec<Vec<ClauseLiteral>> = background
            .into_iter()
            .map(|clause| clause.iter().map(|axiom| atoms.intern(axiom)).collect())
            .collect();
        let negated_observation = observation
            .components()
            .iter()
            .map(|axiom| atoms.intern(axiom).negated())
            .collect();

        let statistics = OracleStatistics {
            ground_clauses: background.len() as u64,
            ..OracleStatistics::default()
        };

        ClausalOracle {
            atoms,
            background,
            negated_observation,
            transient: Vec::new(),
            model: Vec::new(),
            decision_limit: None,
            statistics,
        }
    }

    /// Grounds the rules of `document` over its individuals and creates an oracle for its
    /// observation.
    pub fn from_document(document: &KnowledgeBaseDocument) -> Result<ClausalOracle, OracleError> {
        let individuals: Vec<Arc<str>> = document.individuals.iter().map(to_arc).collect();

        let mut clauses = Vec::new();
        for rule in &document.rules {
            clauses.extend(ground_rule(rule, &individuals)?);
        }

        let observation = document
            .observation
            .iter()
            .map(ground_axiom)
            .collect::<Result<Vec<_>, _>>()?;
        let observation =
            Observation::new(observation).map_err(|error| OracleError::Other(error.to_string()))?;

        let oracle = ClausalOracle::new(clauses, &observation);
        debug!(
            "Grounded {} rules into {} clauses over {} atoms",
            document.rules.len(),
            oracle.background.len(),
            oracle.atoms.len()
        );

        Ok(oracle)
    }

    /// Bounds the number of decisions of a single check. A check which exceeds the limit fails
    /// with [`OracleError::ResourceLimit`].
    pub fn with_decision_limit(mut self, decision_limit: Option<u64>) -> ClausalOracle {
        self.decision_limit = decision_limit;
        self
    }

    pub fn statistics(&self) -> OracleStatistics {
        self.statistics
    }

    fn clauses<'a>(
        &'a self,
        with_observation: bool,
        units: &'a [ClauseLiteral],
    ) -> Vec<&'a [ClauseLiteral]> {
        let mut clauses: Vec<&[ClauseLiteral]> =
            self.background.iter().map(Vec::as_slice).collect();
        if with_observation {
            clauses.push(&self.negated_observation);
        }
        clauses.extend(units.iter().map(std::slice::from_ref));

        clauses
    }

    fn record_check(&mut self, num_decisions: u64) {
        self.statistics.satisfiability_checks += 1;
        self.statistics.decisions += num_decisions;
    }
}

fn solve(
    clauses: Vec<&[ClauseLiteral]>,
    num_atoms: usize,
    decision_limit: Option<u64>,
) -> (Result<Option<Vec<bool>>, OracleError>, u64) {
    let mut dpll = Dpll::new(clauses, num_atoms, decision_limit);
    let result = dpll.solve();

    (result, dpll.num_decisions())
}

impl ConsistencyOracle for ClausalOracle {
    fn add_axiom(&mut self, axiom: &Axiom) {
        let literal = self.atoms.intern(axiom);
        self.transient.push(literal);
    }

    fn reset_to_original(&mut self) {
        self.transient.clear();
    }

    fn is_consistent(&mut self) -> Result<bool, OracleError> {
        let (result, num_decisions) = solve(
            self.clauses(true, &self.transient),
            self.atoms.len(),
            self.decision_limit,
        );
        self.record_check(num_decisions);

        match result? {
            Some(model) => {
                self.model = model;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn is_consistent_with_background(&mut self, axioms: &[Axiom]) -> Result<bool, OracleError> {
        let units: Vec<ClauseLiteral> = axioms.iter().map(|a| self.atoms.intern(a)).collect();

        let (result, num_decisions) = solve(
            self.clauses(false, &units),
            self.atoms.len(),
            self.decision_limit,
        );
        self.record_check(num_decisions);

        Ok(result?.is_some())
    }

    fn holds_in_model(&self, axiom: &Axiom) -> bool {
        match self.atoms.lookup(axiom) {
            Some(literal) => {
                let value = self
                    .model
                    .get(literal.atom().index())
                    .copied()
                    .unwrap_or(false);
                value == literal.is_positive()
            }
            // Atoms the oracle has never seen are false in every model it returns.
            None => axiom.is_negated(),
        }
    }
}

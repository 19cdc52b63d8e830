use std::fmt::Display;
use std::fmt::Formatter;

use itertools::Itertools;

use super::Axiom;
use crate::AbductionError;

/// The observation to explain: a non-empty conjunction of axioms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    components: Vec<Axiom>,
}

impl Observation {
    pub fn new(components: Vec<Axiom>) -> Result<Observation, AbductionError> {
        if components.is_empty() {
            return Err(AbductionError::EmptyObservation);
        }

        Ok(Observation { components })
    }

    pub fn components(&self) -> &[Axiom] {
        &self.components
    }

    /// Whether the observation consists of more than one axiom.
    pub fn is_multi_observation(&self) -> bool {
        self.components.len() > 1
    }

    /// The complements of the components; the negated observation is their disjunction.
    pub fn negated(&self) -> Vec<Axiom> {
        self.components.iter().map(Axiom::complement).collect()
    }

    pub fn contains(&self, axiom: &Axiom) -> bool {
        self.components.contains(axiom)
    }
}

impl Display for Observation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.components.iter().join(" ∧ "))
    }
}

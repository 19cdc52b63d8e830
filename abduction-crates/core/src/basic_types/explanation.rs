use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;

use super::Axiom;
use super::AxiomSet;

/// A (candidate) explanation: a set of abducibles which, added to the knowledge base, entails the
/// observation.
///
/// Two explanations are equal when their axiom sets are equal; the discovery metadata is not
/// taken into account.
#[derive(Clone, Debug)]
pub struct Explanation {
    axioms: AxiomSet,
    /// The depth of the hitting-set tree at which the explanation was discovered.
    level: usize,
    /// The elapsed solving time, in seconds, at which the explanation was discovered.
    acquire_time: f64,
}

impl Explanation {
    pub fn new(axioms: AxiomSet, level: usize, acquire_time: f64) -> Explanation {
        Explanation {
            axioms,
            level,
            acquire_time,
        }
    }

    pub fn axioms(&self) -> &AxiomSet {
        &self.axioms
    }

    pub fn into_axioms(self) -> AxiomSet {
        self.axioms
    }

    /// The size of the explanation.
    pub fn depth(&self) -> usize {
        self.axioms.len()
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn acquire_time(&self) -> f64 {
        self.acquire_time
    }

    pub fn contains(&self, axiom: &Axiom) -> bool {
        self.axioms.contains(axiom)
    }

    /// Whether the axioms of `other` are all contained in this explanation.
    pub fn contains_all(&self, other: &Explanation) -> bool {
        other.axioms.is_subset(&self.axioms)
    }
}

impl PartialEq for Explanation {
    fn eq(&self, other: &Self) -> bool {
        self.axioms == other.axioms
    }
}

impl Eq for Explanation {}

impl Hash for Explanation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.axioms.hash(state)
    }
}

impl Display for Explanation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.axioms)
    }
}

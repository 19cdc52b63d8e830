//! A brute-force oracle over ground clauses, used to test the solver.
use fnv::FnvHashSet;

use crate::basic_types::Axiom;
use crate::basic_types::Observation;
use crate::oracle::ConsistencyOracle;
use crate::oracle::OracleError;

/// The clause `¬body₁ ∨ … ∨ ¬bodyₙ ∨ head₁ ∨ … ∨ headₘ`.
pub(crate) fn rule(body: &[Axiom], head: &[Axiom]) -> Vec<Axiom> {
    body.iter()
        .map(Axiom::complement)
        .chain(head.iter().cloned())
        .collect()
}

pub(crate) fn class(name: &str, individual: &str) -> Axiom {
    Axiom::class_assertion(name, individual)
}

#[derive(Debug)]
pub(crate) struct TestOracle {
    background: Vec<Vec<Axiom>>,
    negated_observation: Vec<Axiom>,
    added: Vec<Axiom>,
    model: FnvHashSet<Axiom>,
}

impl TestOracle {
    pub(crate) fn new(background: Vec<Vec<Axiom>>, observation: &Observation) -> TestOracle {
        TestOracle {
            background,
            negated_observation: observation.negated(),
            added: Vec::new(),
            model: FnvHashSet::default(),
        }
    }

    /// Finds the first assignment, in order of the bit patterns, which satisfies every clause.
    fn solve(clauses: &[Vec<Axiom>]) -> Option<FnvHashSet<Axiom>> {
        let mut atoms: Vec<Axiom> = clauses
            .iter()
            .flatten()
            .map(positive)
            .collect();
        atoms.sort();
        atoms.dedup();
        assert!(atoms.len() < 20, "too many atoms for the test oracle");

        (0_u32..(1 << atoms.len())).find_map(|mask| {
            let true_atoms: FnvHashSet<Axiom> = atoms
                .iter()
                .enumerate()
                .filter(|(index, _)| mask & (1 << *index) != 0)
                .map(|(_, atom)| atom.clone())
                .collect();

            clauses
                .iter()
                .all(|clause| clause.iter().any(|literal| holds(&true_atoms, literal)))
                .then_some(true_atoms)
        })
    }
}

fn positive(axiom: &Axiom) -> Axiom {
    if axiom.is_negated() {
        axiom.complement()
    } else {
        axiom.clone()
    }
}

fn holds(true_atoms: &FnvHashSet<Axiom>, literal: &Axiom) -> bool {
    true_atoms.contains(&positive(literal)) != literal.is_negated()
}

impl ConsistencyOracle for TestOracle {
    fn add_axiom(&mut self, axiom: &Axiom) {
        self.added.push(axiom.clone());
    }

    fn reset_to_original(&mut self) {
        self.added.clear();
    }

    fn is_consistent(&mut self) -> Result<bool, OracleError> {
        let mut clauses = self.background.clone();
        clauses.push(self.negated_observation.clone());
        clauses.extend(self.added.iter().map(|axiom| vec![axiom.clone()]));

        match Self::solve(&clauses) {
            Some(model) => {
                self.model = model;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn is_consistent_with_background(&mut self, axioms: &[Axiom]) -> Result<bool, OracleError> {
        let mut clauses = self.background.clone();
        clauses.extend(axioms.iter().map(|axiom| vec![axiom.clone()]));
        Ok(Self::solve(&clauses).is_some())
    }

    fn holds_in_model(&self, axiom: &Axiom) -> bool {
        holds(&self.model, axiom)
    }
}

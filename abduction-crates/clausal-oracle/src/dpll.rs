//! A chronological backtracking search with unit propagation over ground clauses.
use abduction_core::OracleError;

use crate::atoms::Atom;
use crate::atoms::ClauseLiteral;

enum ClauseStatus {
    Satisfied,
    Falsified,
    Unit(ClauseLiteral),
    Unresolved,
}

#[derive(Clone, Copy, Debug)]
struct Decision {
    atom: Atom,
    /// The length of the trail before the decision was made.
    trail_length: usize,
    flipped: bool,
}

/// Decides the satisfiability of a set of clauses.
///
/// Decisions assign `false` first, so atoms which no clause forces to be true are false in the
/// returned model.
#[derive(Debug)]
pub(crate) struct Dpll<'clauses> {
    clauses: Vec<&'clauses [ClauseLiteral]>,
    assignment: Vec<Option<bool>>,
    trail: Vec<Atom>,
    decisions: Vec<Decision>,
    decision_limit: Option<u64>,
    num_decisions: u64,
}

impl<'clauses> Dpll<'clauses> {
    pub(crate) fn new(
        clauses: Vec<&'clauses [ClauseLiteral]>,
        num_atoms: usize,
        decision_limit: Option<u64>,
    ) -> Self {
        Dpll {
            clauses,
            assignment: vec![None; num_atoms],
            trail: Vec::new(),
            decisions: Vec::new(),
            decision_limit,
            num_decisions: 0,
        }
    }

    pub(crate) fn num_decisions(&self) -> u64 {
        self.num_decisions
    }

    /// Returns the truth value of every atom in a satisfying assignment, or `None` if the
    /// clauses are unsatisfiable.
    pub(crate) fn solve(&mut self) -> Result<Option<Vec<bool>>, OracleError> {
        loop {
            if self.propagate() {
                let Some(atom) = self.next_branching_atom() else {
                    return Ok(Some(
                        self.assignment
                            .iter()
                            .map(|value| value.unwrap_or(false))
                            .collect(),
                    ));
                };

                self.num_decisions += 1;
                if let Some(limit) = self.decision_limit {
                    if self.num_decisions > limit {
                        return Err(OracleError::ResourceLimit { limit });
                    }
                }

                self.decisions.push(Decision {
                    atom,
                    trail_length: self.trail.len(),
                    flipped: false,
                });
                self.assign(ClauseLiteral::new(atom, false));
            } else if !self.backtrack() {
                return Ok(None);
            }
        }
    }

    /// Undoes decisions until one can be flipped. Returns false if every decision has been
    /// flipped already.
    fn backtrack(&mut self) -> bool {
        while let Some(decision) = self.decisions.pop() {
            for atom in self.trail.drain(decision.trail_length..) {
                self.assignment[atom.index()] = None;
            }

            if !decision.flipped {
                self.decisions.push(Decision {
                    flipped: true,
                    ..decision
                });
                self.assign(ClauseLiteral::new(decision.atom, true));
                return true;
            }
        }

        false
    }

    /// Assigns unit literals until a fixpoint is reached. Returns false on a conflict.
    fn propagate(&mut self) -> bool {
        loop {
            let mut changed = false;

            for index in 0..self.clauses.len() {
                let clause = self.clauses[index];
                match self.status(clause) {
                    ClauseStatus::Falsified => return false,
                    ClauseStatus::Unit(literal) => {
                        self.assign(literal);
                        changed = true;
                    }
                    ClauseStatus::Satisfied | ClauseStatus::Unresolved => {}
                }
            }

            if !changed {
                return true;
            }
        }
    }

    /// The first unassigned atom of the first clause which is not yet satisfied.
    fn next_branching_atom(&self) -> Option<Atom> {
        self.clauses
            .iter()
            .filter(|clause| !matches!(self.status(clause), ClauseStatus::Satisfied))
            .flat_map(|clause| clause.iter())
            .find(|literal| self.value(**literal).is_none())
            .map(|literal| literal.atom())
    }

    fn status(&self, clause: &[ClauseLiteral]) -> ClauseStatus {
        let mut unassigned = None;
        let mut num_unassigned = 0;

        for &literal in clause {
            match self.value(literal) {
                Some(true) => return ClauseStatus::Satisfied,
                Some(false) => {}
                None => {
                    num_unassigned += 1;
                    unassigned = Some(literal);
                }
            }
        }

        match (num_unassigned, unassigned) {
            (0, _) => ClauseStatus::Falsified,
            (1, Some(literal)) => ClauseStatus::Unit(literal),
            _ => ClauseStatus::Unresolved,
        }
    }

    fn value(&self, literal: ClauseLiteral) -> Option<bool> {
        self.assignment[literal.atom().index()].map(|value| value == literal.is_positive())
    }

    fn assign(&mut self, literal: ClauseLiteral) {
        self.assignment[literal.atom().index()] = Some(literal.is_positive());
        self.trail.push(literal.atom());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::AtomTable;
    use abduction_core::Axiom;

    fn literals(table: &mut AtomTable, axioms: &[Axiom]) -> Vec<ClauseLiteral> {
        axioms.iter().map(|axiom| table.intern(axiom)).collect()
    }

    #[test]
    fn unconstrained_atoms_are_false() {
        let mut table = AtomTable::default();
        let a = Axiom::class_assertion("A", "a");
        let b = Axiom::class_assertion("B", "a");
        let clause = literals(&mut table, &[a, b.clone()]);
        let unit = literals(&mut table, &[b]);

        let mut dpll = Dpll::new(vec![clause.as_slice(), unit.as_slice()], table.len(), None);
        let model = dpll.solve().expect("no limit").expect("satisfiable");

        assert_eq!(vec![false, true], model);
    }

    #[test]
    fn contradicting_units_are_unsatisfiable() {
        let mut table = AtomTable::default();
        let a = Axiom::class_assertion("A", "a");
        let positive = literals(&mut table, &[a.clone()]);
        let negative = literals(&mut table, &[a.negate()]);

        let mut dpll = Dpll::new(vec![positive.as_slice(), negative.as_slice()], table.len(), None);

        assert_eq!(None, dpll.solve().expect("no limit"));
    }

    #[test]
    fn branching_backtracks_into_the_true_value() {
        let mut table = AtomTable::default();
        let a = Axiom::class_assertion("A", "a");
        let b = Axiom::class_assertion("B", "a");
        // (A ∨ B) ∧ (A ∨ ¬B): the first decision A = false leads to a conflict.
        let first = literals(&mut table, &[a.clone(), b.clone()]);
        let second = literals(&mut table, &[a, b.negate()]);

        let mut dpll = Dpll::new(vec![first.as_slice(), second.as_slice()], table.len(), None);
        let model = dpll.solve().expect("no limit").expect("satisfiable");

        assert!(model[0]);
        assert_eq!(1, dpll.num_decisions());
    }

    #[test]
    fn exceeding_the_decision_limit_is_an_error() {
        let mut table = AtomTable::default();
        let clause = literals(
            &mut table,
            &[
                Axiom::class_assertion("A", "a"),
                Axiom::class_assertion("B", "a"),
            ],
        );

        let mut dpll = Dpll::new(vec![clause.as_slice()], table.len(), Some(0));

        assert!(matches!(
            dpll.solve(),
            Err(OracleError::ResourceLimit { limit: 0 })
        ));
    }

    #[test]
    fn the_empty_clause_is_unsatisfiable() {
        let empty: &[ClauseLiteral] = &[];
        let mut dpll = Dpll::new(vec![empty], 0, None);

        assert_eq!(None, dpll.solve().expect("no limit"));
    }
}

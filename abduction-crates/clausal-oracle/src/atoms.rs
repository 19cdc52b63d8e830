use abduction_core::Axiom;
use fnv::FnvHashMap;

/// A ground atom, identified by its position in the [`AtomTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Atom(usize);

impl Atom {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// An atom or its negation, as it occurs in a clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ClauseLiteral {
    atom: Atom,
    positive: bool,
}

impl ClauseLiteral {
    pub(crate) fn new(atom: Atom, positive: bool) -> ClauseLiteral {
        ClauseLiteral { atom, positive }
    }

    pub(crate) fn atom(self) -> Atom {
        self.atom
    }

    pub(crate) fn is_positive(self) -> bool {
        self.positive
    }

    pub(crate) fn negated(self) -> ClauseLiteral {
        ClauseLiteral {
            atom: self.atom,
            positive: !self.positive,
        }
    }
}

/// Maps the positive form of every axiom the oracle has seen to an [`Atom`].
#[derive(Clone, Debug, Default)]
pub(crate) struct AtomTable {
    atoms: FnvHashMap<Axiom, Atom>,
    axioms: Vec<Axiom>,
}

impl AtomTable {
    /// Returns the literal of `axiom`, creating a new atom if its positive form is unknown.
    pub(crate) fn intern(&mut self, axiom: &Axiom) -> ClauseLiteral {
        let positive = positive_form(axiom);
        let atom = match self.atoms.get(&positive) {
            Some(atom) => *atom,
            None => {
                let atom = Atom(self.axioms.len());
                self.axioms.push(positive.clone());
                let _ = self.atoms.insert(positive, atom);
                atom
            }
        };

        ClauseLiteral::new(atom, !axiom.is_negated())
    }

    pub(crate) fn lookup(&self, axiom: &Axiom) -> Option<ClauseLiteral> {
        self.atoms
            .get(&positive_form(axiom))
            .map(|atom| ClauseLiteral::new(*atom, !axiom.is_negated()))
    }

    pub(crate) fn len(&self) -> usize {
        self.axioms.len()
    }
}

fn positive_form(axiom: &Axiom) -> Axiom {
    if axiom.is_negated() {
        axiom.complement()
    } else {
        axiom.clone()
    }
}

use crate::basic_types::Axiom;
use crate::basic_types::AxiomSet;

/// The axioms which are currently assumed when probing the oracle.
///
/// Axioms are pushed with [`Path::assume`] and removed again with [`Path::retract`]; only the
/// axioms which were not yet on the path are removed, so nested assumptions of overlapping sets
/// restore the path exactly.
#[derive(Clone, Debug, Default)]
pub(crate) struct Path {
    axioms: AxiomSet,
}

/// The axioms which a call to [`Path::assume`] actually added.
#[must_use = "an assumption has to be retracted from the path"]
#[derive(Debug)]
pub(crate) struct Assumption {
    added: Vec<Axiom>,
}

impl Path {
    pub(crate) fn axioms(&self) -> &AxiomSet {
        &self.axioms
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }

    pub(crate) fn assume<'a>(&mut self, axioms: impl IntoIterator<Item = &'a Axiom>) -> Assumption {
        let added = axioms
            .into_iter()
            .filter(|&axiom| self.axioms.insert(axiom.clone()))
            .cloned()
            .collect();

        Assumption { added }
    }

    pub(crate) fn retract(&mut self, assumption: Assumption) {
        self.axioms.remove_all(&assumption.added);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axiom(name: &str) -> Axiom {
        Axiom::class_assertion(name, "a")
    }

    #[test]
    fn retracting_restores_the_previous_path() {
        let mut path = Path::default();
        let _base = path.assume(&[axiom("A")]);

        let assumption = path.assume(&[axiom("A"), axiom("B")]);
        assert_eq!(2, path.axioms().len());

        path.retract(assumption);
        assert_eq!(1, path.axioms().len());
        assert!(path.axioms().contains(&axiom("A")));
    }

    #[test]
    fn nested_assumptions_unwind_in_order() {
        let mut path = Path::default();

        let outer = path.assume(&[axiom("A"), axiom("B")]);
        let inner = path.assume(&[axiom("B"), axiom("C")]);
        assert_eq!(3, path.axioms().len());

        path.retract(inner);
        assert_eq!(2, path.axioms().len());
        path.retract(outer);
        assert!(path.is_empty());
    }
}

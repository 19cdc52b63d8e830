use crate::basic_types::Axiom;
use crate::basic_types::AxiomSet;

/// A node of the hitting-set tree.
#[derive(Clone, Debug)]
pub(crate) struct ModelNode {
    /// The axioms assumed on the way from the root to this node.
    pub(crate) label: AxiomSet,
    /// The abducibles which are violated in a model of the label; these are the edges to the
    /// children.
    pub(crate) data: AxiomSet,
    pub(crate) depth: usize,
    /// Abducibles which on their own formed a conflict at this node or one of its ancestors.
    pub(crate) length_one_conflicts: AxiomSet,
}

impl ModelNode {
    pub(crate) fn root(data: AxiomSet) -> ModelNode {
        ModelNode {
            label: AxiomSet::new(),
            data,
            depth: 0,
            length_one_conflicts: AxiomSet::new(),
        }
    }

    pub(crate) fn child(&self, label: AxiomSet, data: AxiomSet, new_conflicts: &[Axiom]) -> ModelNode {
        let mut length_one_conflicts = self.length_one_conflicts.clone();
        length_one_conflicts.add_all(new_conflicts.iter().cloned());

        ModelNode {
            label,
            data,
            depth: self.depth + 1,
            length_one_conflicts,
        }
    }

    /// Whether `axiom` can never extend the label of this node: its complement is already
    /// assumed.
    pub(crate) fn is_incorrect_edge(&self, axiom: &Axiom) -> bool {
        self.label.contains(&axiom.complement())
    }
}

impl PartialEq for ModelNode {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for ModelNode {}

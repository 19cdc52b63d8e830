use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;

use fnv::FnvHashSet;
use fnv::FnvHasher;
use itertools::Itertools;

use super::Axiom;

/// An unordered collection of unique [`Axiom`]s.
///
/// Adding an axiom which is already present, or removing one which is absent, is a no-op.
/// Iteration order is deterministic for a given sequence of operations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AxiomSet {
    axioms: FnvHashSet<Axiom>,
}

impl AxiomSet {
    pub fn new() -> AxiomSet {
        AxiomSet::default()
    }

    pub fn add(&mut self, axiom: Axiom) {
        let _ = self.axioms.insert(axiom);
    }

    pub fn add_all(&mut self, axioms: impl IntoIterator<Item = Axiom>) {
        self.axioms.extend(axioms);
    }

    pub fn remove(&mut self, axiom: &Axiom) {
        let _ = self.axioms.remove(axiom);
    }

    pub fn remove_all<'a>(&mut self, axioms: impl IntoIterator<Item = &'a Axiom>) {
        for axiom in axioms {
            let _ = self.axioms.remove(axiom);
        }
    }

    /// Adds the axiom and reports whether it was not yet present.
    pub(crate) fn insert(&mut self, axiom: Axiom) -> bool {
        self.axioms.insert(axiom)
    }

    pub fn contains(&self, axiom: &Axiom) -> bool {
        self.axioms.contains(axiom)
    }

    /// Whether every axiom of `self` is contained in `other`.
    pub fn is_subset(&self, other: &AxiomSet) -> bool {
        self.axioms.is_subset(&other.axioms)
    }

    pub fn len(&self) -> usize {
        self.axioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Axiom> + '_ {
        self.axioms.iter()
    }

    /// Returns an arbitrary but deterministic element.
    pub fn first(&self) -> Option<&Axiom> {
        self.axioms.iter().next()
    }

    /// Copies the set into a sequence in iteration order.
    pub fn to_vec(&self) -> Vec<Axiom> {
        self.axioms.iter().cloned().collect()
    }

    /// Copies the set into a sequence ordered by the axioms themselves.
    pub fn to_sorted_vec(&self) -> Vec<Axiom> {
        self.axioms.iter().cloned().sorted().collect()
    }

    pub fn union(&self, other: &AxiomSet) -> AxiomSet {
        self.axioms.union(&other.axioms).cloned().collect()
    }

    pub fn difference(&self, other: &AxiomSet) -> AxiomSet {
        self.axioms.difference(&other.axioms).cloned().collect()
    }

    /// Whether the set contains an axiom together with its complement.
    pub fn contains_clash(&self) -> bool {
        self.axioms
            .iter()
            .any(|axiom| !axiom.is_negated() && self.axioms.contains(&axiom.complement()))
    }
}

impl Hash for AxiomSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Combine the element hashes commutatively, so that equal sets hash equally regardless
        // of their internal order.
        let combined = self
            .axioms
            .iter()
            .map(|axiom| {
                let mut hasher = FnvHasher::default();
                axiom.hash(&mut hasher);
                hasher.finish()
            })
            .fold(0_u64, u64::wrapping_add);

        state.write_usize(self.axioms.len());
        state.write_u64(combined);
    }
}

impl FromIterator<Axiom> for AxiomSet {
    fn from_iter<T: IntoIterator<Item = Axiom>>(iter: T) -> Self {
        AxiomSet {
            axioms: iter.into_iter().collect(),
        }
    }
}

impl Extend<Axiom> for AxiomSet {
    fn extend<T: IntoIterator<Item = Axiom>>(&mut self, iter: T) {
        self.axioms.extend(iter)
    }
}

impl IntoIterator for AxiomSet {
    type Item = Axiom;
    type IntoIter = std::collections::hash_set::IntoIter<Axiom>;

    fn into_iter(self) -> Self::IntoIter {
        self.axioms.into_iter()
    }
}

impl<'a> IntoIterator for &'a AxiomSet {
    type Item = &'a Axiom;
    type IntoIter = std::collections::hash_set::Iter<'a, Axiom>;

    fn into_iter(self) -> Self::IntoIter {
        self.axioms.iter()
    }
}

impl Display for AxiomSet {
    /// Renders the set as `{A(a),¬B(a)}`, sorted by the rendered axioms.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered = self
            .axioms
            .iter()
            .map(|axiom| axiom.to_string())
            .sorted()
            .join(",");

        write!(f, "{{{rendered}}}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn set(names: &[&str]) -> AxiomSet {
        names
            .iter()
            .map(|name| Axiom::class_assertion(*name, "a"))
            .collect()
    }

    #[test]
    fn duplicate_add_and_missing_remove_are_no_ops() {
        let mut axioms = set(&["A"]);

        axioms.add(Axiom::class_assertion("A", "a"));
        assert_eq!(1, axioms.len());

        axioms.remove(&Axiom::class_assertion("B", "a"));
        assert_eq!(1, axioms.len());

        axioms.remove_all(&set(&["A", "C"]));
        assert!(axioms.is_empty());
    }

    #[test]
    fn copies_are_independent() {
        let original = set(&["A", "B"]);
        let mut copy = original.clone();
        copy.add(Axiom::class_assertion("C", "a"));

        assert_eq!(2, original.len());
        assert_eq!(3, copy.len());
    }

    #[test]
    fn equal_sets_hash_equally() {
        let first = set(&["A", "B", "C"]);
        let second = set(&["C", "A", "B"]);

        let mut seen = HashSet::new();
        let _ = seen.insert(first);
        assert!(seen.contains(&second));
    }

    #[test]
    fn subset_union_and_difference() {
        let small = set(&["A"]);
        let large = set(&["A", "B"]);

        assert!(small.is_subset(&large));
        assert!(!large.is_subset(&small));
        assert_eq!(large, small.union(&set(&["B"])));
        assert_eq!(set(&["B"]), large.difference(&small));
    }

    #[test]
    fn clash_is_detected() {
        let mut axioms = set(&["A", "B"]);
        assert!(!axioms.contains_clash());

        axioms.add(Axiom::class_assertion("B", "a").negate());
        assert!(axioms.contains_clash());
    }

    #[test]
    fn display_is_sorted() {
        let mut axioms = set(&["B", "A"]);
        axioms.add(Axiom::class_assertion("C", "a").negate());

        assert_eq!("{A(a),B(a),¬C(a)}", axioms.to_string());
    }
}

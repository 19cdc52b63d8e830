use fnv::FnvHashMap;
use fnv::FnvHashSet;
use itertools::Itertools;

use crate::basic_types::Axiom;
use crate::basic_types::AxiomSet;
use crate::basic_types::Explanation;
use crate::options::ConflictCachingHeuristic;

/// An unordered pair of distinct axioms; the smaller axiom is always stored first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct AxiomPair {
    first: Axiom,
    second: Axiom,
}

impl AxiomPair {
    fn new(a: Axiom, b: Axiom) -> AxiomPair {
        if a <= b {
            AxiomPair { first: a, second: b }
        } else {
            AxiomPair { first: b, second: a }
        }
    }
}

/// Splits sets of literals into two halves for the conflict search.
///
/// Without a [`ConflictCachingHeuristic`] the literals are assigned alternately. The heuristics
/// steer axioms which took part in earlier conflicts into different halves.
#[derive(Debug)]
pub(crate) struct SetDivider {
    heuristic: ConflictCachingHeuristic,

    /// The indices of explanations which the longest-conflict heuristic has not used on the
    /// current branch.
    unused_explanations: FnvHashSet<usize>,
    /// The explanation selected by the last call to [`SetDivider::take_longest_unused`].
    last_used_explanation: Option<usize>,

    /// How often every pair of axioms occurred together in an explanation, in order of first
    /// occurrence.
    pair_occurrences: Vec<(AxiomPair, u64)>,
    pair_indices: FnvHashMap<AxiomPair, usize>,
    /// Every count ever recorded, kept sorted.
    sorted_counts: Vec<u64>,
    median: f64,
}

impl SetDivider {
    pub(crate) fn new(heuristic: ConflictCachingHeuristic) -> SetDivider {
        SetDivider {
            heuristic,
            unused_explanations: FnvHashSet::default(),
            last_used_explanation: None,
            pair_occurrences: Vec::new(),
            pair_indices: FnvHashMap::default(),
            sorted_counts: Vec::new(),
            median: 0.0,
        }
    }

    /// Splits `literals` into two disjoint halves whose sizes differ by at most one, using the
    /// configured heuristic when it has information to work with.
    pub(crate) fn divide(
        &mut self,
        literals: &AxiomSet,
        explanations: &[Explanation],
    ) -> (AxiomSet, AxiomSet) {
        if explanations.is_empty() {
            return Self::divide_alternately(literals);
        }

        match self.heuristic {
            ConflictCachingHeuristic::None => Self::divide_alternately(literals),
            ConflictCachingHeuristic::LongestConflict => match self.last_used_explanation {
                Some(index) => Self::divide_by_conflict(literals, explanations[index].axioms()),
                None => Self::divide_alternately(literals),
            },
            ConflictCachingHeuristic::Median => self.divide_by_pair_occurrence(literals),
        }
    }

    /// Splits `literals` alternately, in the order of the axioms.
    pub(crate) fn divide_alternately(literals: &AxiomSet) -> (AxiomSet, AxiomSet) {
        let mut halves = (AxiomSet::new(), AxiomSet::new());
        for (count, axiom) in literals.to_sorted_vec().into_iter().enumerate() {
            if count % 2 == 0 {
                halves.0.add(axiom);
            } else {
                halves.1.add(axiom);
            }
        }
        halves
    }

    fn divide_by_conflict(literals: &AxiomSet, conflict: &AxiomSet) -> (AxiomSet, AxiomSet) {
        let (from_conflict, rest): (Vec<_>, Vec<_>) = literals
            .to_sorted_vec()
            .into_iter()
            .partition(|axiom| conflict.contains(axiom));

        let mut halves = (AxiomSet::new(), AxiomSet::new());
        for (count, axiom) in from_conflict.into_iter().chain(rest).enumerate() {
            if count % 2 == 0 {
                halves.0.add(axiom);
            } else {
                halves.1.add(axiom);
            }
        }
        halves
    }

    fn divide_by_pair_occurrence(&mut self, literals: &AxiomSet) -> (AxiomSet, AxiomSet) {
        let mut remaining = literals.clone();
        let mut halves = (AxiomSet::new(), AxiomSet::new());

        for (pair, count) in &self.pair_occurrences {
            if (*count as f64) < self.median {
                continue;
            }
            if remaining.contains(&pair.first) && remaining.contains(&pair.second) {
                remaining.remove(&pair.first);
                remaining.remove(&pair.second);
                halves.0.add(pair.first.clone());
                halves.1.add(pair.second.clone());
            }
        }

        let (first, second) = Self::divide_alternately(&remaining);
        halves.0.add_all(first);
        halves.1.add_all(second);

        self.decrease_median();
        halves
    }

    /// Makes the first `count` explanations available to the longest-conflict heuristic again.
    pub(crate) fn reset_unused_explanations(&mut self, count: usize) {
        self.unused_explanations.extend(0..count);
    }

    /// Selects the largest explanation which has not been used on the current branch and marks
    /// it as used.
    pub(crate) fn take_longest_unused(&mut self, explanations: &[Explanation]) -> Option<usize> {
        let longest = self
            .unused_explanations
            .iter()
            .copied()
            .filter(|&index| index < explanations.len())
            .max_by_key(|&index| (explanations[index].depth(), std::cmp::Reverse(index)));

        self.last_used_explanation = longest;
        if let Some(index) = longest {
            let _ = self.unused_explanations.remove(&index);
        }
        longest
    }

    /// Makes an explanation taken by [`SetDivider::take_longest_unused`] available again.
    pub(crate) fn release(&mut self, index: Option<usize>) {
        if let Some(index) = index {
            let _ = self.unused_explanations.insert(index);
        }
    }

    pub(crate) fn median(&self) -> f64 {
        self.median
    }

    pub(crate) fn set_median(&mut self, median: f64) {
        self.median = median;
    }

    fn decrease_median(&mut self) {
        self.median /= 2.0;
        if self.median < 1.0 {
            self.median = 0.0;
        }
    }

    /// Counts every pair of axioms of a newly found explanation and recomputes the median.
    pub(crate) fn record_pairs(&mut self, explanation: &AxiomSet) {
        for (a, b) in explanation.to_sorted_vec().into_iter().tuple_combinations() {
            let pair = AxiomPair::new(a, b);
            let count = match self.pair_indices.get(&pair) {
                Some(&index) => {
                    self.pair_occurrences[index].1 += 1;
                    self.pair_occurrences[index].1
                }
                None => {
                    let _ = self
                        .pair_indices
                        .insert(pair.clone(), self.pair_occurrences.len());
                    self.pair_occurrences.push((pair, 1));
                    1
                }
            };

            let position = self.sorted_counts.partition_point(|&other| other <= count);
            self.sorted_counts.insert(position, count);
        }

        self.update_median();
    }

    fn update_median(&mut self) {
        let len = self.sorted_counts.len();
        if len == 0 {
            return;
        }

        self.median = if len % 2 == 0 {
            (self.sorted_counts[len / 2 - 1] + self.sorted_counts[len / 2]) as f64 / 2.0
        } else {
            self.sorted_counts[len / 2] as f64
        };
    }
}

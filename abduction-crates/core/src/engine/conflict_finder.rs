//! The MXP conflict search: a divide-and-conquer search which, given a set of literals, finds a
//! subset which is consistent with the current path together with the minimal conflicts it
//! encountered on the way.

use log::debug;

use super::hybrid_solver::Search;
use super::set_divider::SetDivider;
use crate::basic_types::AxiomSet;
use crate::basic_types::Explanation;
use crate::error::AbductionError;
use crate::options::ConflictCachingHeuristic;
use crate::oracle::ConsistencyOracle;
use crate::progress::ExplanationSink;
use crate::progress::ProgressSink;
use crate::termination::TerminationCondition;

/// The result of a conflict search.
#[derive(Clone, Debug, Default)]
pub(crate) struct Conflict {
    /// Literals which are jointly consistent with the path.
    pub(crate) remainder: AxiomSet,
    /// The minimal conflicts found while computing the remainder.
    pub(crate) explanations: Vec<Explanation>,
}

impl<Oracle, Termination, Progress, Sink> Search<'_, Oracle, Termination, Progress, Sink>
where
    Oracle: ConsistencyOracle,
    Termination: TerminationCondition,
    Progress: ProgressSink,
    Sink: ExplanationSink,
{
    /// Splits `literals` into a part which is consistent with the path and the conflicts which
    /// prevent the rest from being added.
    pub(crate) fn find_conflicts(&mut self, literals: &AxiomSet) -> Result<Conflict, AbductionError> {
        if self.is_timeout() {
            return Ok(Conflict::default());
        }

        if self.probe_with(literals)? {
            return Ok(Conflict {
                remainder: literals.clone(),
                explanations: Vec::new(),
            });
        }

        if literals.len() <= 1 {
            // A single literal which is inconsistent with the path is a minimal conflict.
            let explanations = if literals.is_empty() {
                Vec::new()
            } else {
                self.statistics.conflicts_found += 1;
                vec![self.new_explanation(literals.clone())]
            };
            return Ok(Conflict {
                remainder: AxiomSet::new(),
                explanations,
            });
        }

        let longest = match self.options.conflict_caching {
            ConflictCachingHeuristic::LongestConflict => self
                .divider
                .take_longest_unused(self.manager.possible_explanations()),
            _ => None,
        };
        let (first, second) = self
            .divider
            .divide(literals, self.manager.possible_explanations());
        let median = self.divider.median();

        let first = self.find_conflicts(&first)?;
        self.restore_divider(longest, median);
        let second = self.find_conflicts(&second)?;
        self.restore_divider(longest, median);

        let mut explanations = first.explanations;
        explanations.extend(second.explanations);

        let mut first_remainder = first.remainder;
        let second_remainder = second.remainder;
        let mut remainder = first_remainder.union(&second_remainder);

        while !self.probe_with(&remainder)? {
            if self.tracker.is_time_based() {
                let elapsed = self.elapsed();
                if let Some((percentage, message)) = self.tracker.time_elapsed(elapsed) {
                    self.progress.update_progress(percentage, &message);
                }
            }

            if self.is_timeout() {
                break;
            }

            // Isolate the part of the first remainder which conflicts with the second one, and
            // then the part of the second remainder which conflicts with that.
            let isolated = self.with_assumed(&second_remainder, |search| {
                search.get_conflict(&second_remainder, &first_remainder)
            })?;
            let mut conflict = self.with_assumed(&isolated, |search| {
                search.get_conflict(&isolated, &second_remainder)
            })?;
            conflict.add_all(isolated.iter().cloned());

            let Some(removed) = isolated.first().cloned() else {
                break;
            };
            first_remainder.remove(&removed);
            remainder = first_remainder.union(&second_remainder);

            let explanation = self.new_explanation(conflict);
            if explanations.contains(&explanation) || self.is_timeout() {
                break;
            }

            let explanation = if self.options.qxp_refinement {
                self.refine(explanation)?
            } else {
                explanation
            };
            debug!("Found conflict {explanation}");
            self.statistics.conflicts_found += 1;
            if self.options.conflict_caching == ConflictCachingHeuristic::Median {
                self.divider.record_pairs(explanation.axioms());
            }
            explanations.push(explanation);
        }

        Ok(Conflict {
            remainder,
            explanations,
        })
    }

    /// Isolates a minimal subset of `literals` which is inconsistent with the path, following
    /// QuickXplain. `axioms` are the literals most recently added to the path.
    pub(crate) fn get_conflict(
        &mut self,
        axioms: &AxiomSet,
        literals: &AxiomSet,
    ) -> Result<AxiomSet, AbductionError> {
        if self.is_timeout() {
            return Ok(AxiomSet::new());
        }

        if !axioms.is_empty() && !self.probe()? {
            return Ok(AxiomSet::new());
        }

        if literals.len() <= 1 {
            return Ok(literals.clone());
        }

        let (first, second) = SetDivider::divide_alternately(literals);
        let in_second =
            self.with_assumed(&first, |search| search.get_conflict(&first, &second))?;
        let in_first =
            self.with_assumed(&in_second, |search| search.get_conflict(&in_second, &first))?;

        Ok(in_first.union(&in_second))
    }

    /// Shrinks `explanation`, together with the current path, to a minimal explanation.
    ///
    /// The search runs on a path of its own; the current path is restored afterwards. If the
    /// search is interrupted, the explanation is returned unchanged.
    pub(crate) fn refine(&mut self, explanation: Explanation) -> Result<Explanation, AbductionError> {
        self.statistics.qxp_refinements += 1;

        let candidates = explanation.axioms().union(self.path.axioms());
        let outer_path = std::mem::take(&mut self.path);
        let minimal = self.get_conflict(&AxiomSet::new(), &candidates);
        self.path = outer_path;

        let minimal = minimal?;
        if minimal.is_empty() {
            return Ok(explanation);
        }

        Ok(Explanation::new(
            minimal,
            explanation.level(),
            explanation.acquire_time(),
        ))
    }

    fn new_explanation(&self, axioms: AxiomSet) -> Explanation {
        Explanation::new(axioms, self.current_depth, self.elapsed())
    }

    /// Undoes the changes a recursive call made to the state of the set divider.
    fn restore_divider(&mut self, longest: Option<usize>, median: f64) {
        match self.options.conflict_caching {
            ConflictCachingHeuristic::LongestConflict => self.divider.release(longest),
            ConflictCachingHeuristic::Median => self.divider.set_median(median),
            ConflictCachingHeuristic::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::basic_types::Observation;
    use crate::options::SolverOptions;
    use crate::termination::Indefinite;
    use crate::test_oracle::class;
    use crate::test_oracle::rule;
    use crate::test_oracle::TestOracle;

    type TestSearch<'a> = Search<'a, TestOracle, Indefinite, (), ()>;

    fn set(names: &[&str]) -> AxiomSet {
        names.iter().map(|name| class(name, "a")).collect()
    }

    /// Runs `f` on a fresh search over `A(a) → C(a)`, `B(a) ∧ D(a) → C(a)` and
    /// `E(a) ∧ F(a) → C(a)`, with observation `C(a)`.
    fn with_search<R>(f: impl FnOnce(&mut TestSearch<'_>) -> R) -> R {
        let observation = Observation::new(vec![class("C", "a")]).expect("non-empty observation");
        let mut oracle = TestOracle::new(
            vec![
                rule(&[class("A", "a")], &[class("C", "a")]),
                rule(&[class("B", "a"), class("D", "a")], &[class("C", "a")]),
                rule(&[class("E", "a"), class("F", "a")], &[class("C", "a")]),
            ],
            &observation,
        );
        let mut progress = ();
        let mut sink = ();

        let mut search = Search::new(
            SolverOptions::default(),
            set(&["A", "B", "D", "E", "F", "G"]),
            observation,
            &mut oracle,
            Indefinite,
            &mut progress,
            &mut sink,
        );
        f(&mut search)
    }

    fn refined(search: &mut TestSearch<'_>, names: &[&str]) -> String {
        search
            .refine(Explanation::new(set(names), 0, 0.0))
            .expect("the test oracle does not fail")
            .to_string()
    }

    #[test]
    fn conflicts_are_the_minimal_explanations() {
        with_search(|search| {
            let conflict = search
                .find_conflicts(&set(&["A", "B", "D", "E", "F", "G"]))
                .expect("the test oracle does not fail");
            assert!(search.path.is_empty());

            let found: BTreeSet<String> = conflict
                .explanations
                .iter()
                .map(|explanation| explanation.to_string())
                .collect();
            let expected: BTreeSet<String> = ["{A(a)}", "{B(a),D(a)}", "{E(a),F(a)}"]
                .into_iter()
                .map(str::to_owned)
                .collect();
            assert_eq!(expected, found);

            assert!(conflict.remainder.contains(&class("G", "a")));
            assert!(search
                .probe_with(&conflict.remainder)
                .expect("the test oracle does not fail"));
            assert!(search.path.is_empty());
        });
    }

    #[test]
    fn consistent_literals_have_no_conflicts() {
        with_search(|search| {
            let literals = set(&["B", "E", "G"]);
            let conflict = search
                .find_conflicts(&literals)
                .expect("the test oracle does not fail");

            assert!(conflict.explanations.is_empty());
            assert_eq!(literals, conflict.remainder);
            assert!(search.path.is_empty());
        });
    }

    #[test]
    fn refinement_keeps_minimal_explanations() {
        with_search(|search| {
            assert_eq!("{B(a),D(a)}", refined(search, &["B", "D"]));
            assert!(search.path.is_empty());
        });
    }

    #[test]
    fn refinement_drops_superfluous_axioms() {
        with_search(|search| {
            assert_eq!("{B(a),D(a)}", refined(search, &["B", "D", "G"]));
            assert!(search.path.is_empty());
        });
    }

    #[test]
    fn refinement_restores_the_current_path() {
        with_search(|search| {
            let outer = set(&["G"]);
            let result = search.with_assumed(&outer, |search| {
                let result = refined(search, &["B", "D"]);
                assert_eq!(&outer, search.path.axioms());
                result
            });

            assert_eq!("{B(a),D(a)}", result);
            assert!(search.path.is_empty());
        });
    }

    #[test]
    fn small_literal_sets_are_their_own_conflict() {
        with_search(|search| {
            let empty = AxiomSet::new();
            let single = set(&["A"]);

            assert_eq!(
                single,
                search
                    .get_conflict(&empty, &single)
                    .expect("the test oracle does not fail")
            );
            assert!(search
                .get_conflict(&empty, &empty)
                .expect("the test oracle does not fail")
                .is_empty());
        });
    }

    #[test]
    fn inconsistent_path_yields_no_conflict() {
        with_search(|search| {
            let assumed = set(&["A"]);
            let conflict = search
                .with_assumed(&assumed, |search| {
                    search.get_conflict(&assumed, &set(&["B", "D"]))
                })
                .expect("the test oracle does not fail");

            assert!(conflict.is_empty());
            assert!(search.path.is_empty());
        });
    }
}

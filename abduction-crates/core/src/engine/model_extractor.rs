use log::debug;

use crate::basic_types::AxiomSet;
use crate::oracle::ConsistencyOracle;
use crate::oracle::OracleError;

/// The abducibles split according to one model of the knowledge base, the negated observation
/// and some path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Model {
    /// The abducibles which are true in the model.
    pub(crate) satisfied: AxiomSet,
    /// The abducibles which are false in the model; adding any of them refutes this model.
    pub(crate) violated: AxiomSet,
}

impl Model {
    /// Whether this model also witnesses the consistency of `path`.
    pub(crate) fn covers(&self, path: &AxiomSet) -> bool {
        path.is_subset(&self.satisfied)
    }
}

/// Asks the oracle about paths and keeps every model it reports.
#[derive(Debug, Default)]
pub(crate) struct ModelExtractor {
    models: Vec<Model>,
}

impl ModelExtractor {
    /// Checks whether the knowledge base, the negated observation and `path` are consistent.
    ///
    /// When they are, the witnessing model is stored for later reuse.
    pub(crate) fn probe<Oracle: ConsistencyOracle>(
        &mut self,
        oracle: &mut Oracle,
        universe: &AxiomSet,
        path: &AxiomSet,
    ) -> Result<bool, OracleError> {
        if !Self::check(oracle, path)? {
            return Ok(false);
        }

        let (satisfied, violated): (Vec<_>, Vec<_>) = universe
            .iter()
            .cloned()
            .partition(|axiom| oracle.holds_in_model(axiom));
        let model = Model {
            satisfied: satisfied.into_iter().collect(),
            violated: violated.into_iter().collect(),
        };

        if self.models.last() != Some(&model) {
            debug!(
                "Storing model {} with {} violated abducibles",
                self.models.len(),
                model.violated.len()
            );
            self.models.push(model);
        }

        Ok(true)
    }

    /// Checks consistency of `path` without recording the model.
    pub(crate) fn check<Oracle: ConsistencyOracle>(
        oracle: &mut Oracle,
        path: &AxiomSet,
    ) -> Result<bool, OracleError> {
        oracle.reset_to_original();
        oracle.add_axioms(path);
        oracle.is_consistent()
    }

    /// The most recently stored model which covers `path`.
    pub(crate) fn latest_covering(&self, path: &AxiomSet) -> Option<&Model> {
        self.models.iter().rev().find(|model| model.covers(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Observation;
    use crate::test_oracle::class;
    use crate::test_oracle::rule;
    use crate::test_oracle::TestOracle;

    #[test]
    fn consistent_paths_store_a_reusable_model() {
        let observation = Observation::new(vec![class("C", "a")]).expect("non-empty observation");
        let mut oracle = TestOracle::new(
            vec![rule(&[class("A", "a")], &[class("C", "a")])],
            &observation,
        );
        let universe: AxiomSet = [class("A", "a"), class("B", "a")].into_iter().collect();
        let mut extractor = ModelExtractor::default();

        let path: AxiomSet = [class("B", "a")].into_iter().collect();
        assert!(extractor
            .probe(&mut oracle, &universe, &path)
            .expect("the test oracle does not fail"));

        let model = extractor
            .latest_covering(&path)
            .expect("the model of the path is stored");
        assert!(model.violated.contains(&class("A", "a")));
        assert!(extractor.latest_covering(&universe).is_none());
    }

    #[test]
    fn inconsistent_paths_store_nothing() {
        let observation = Observation::new(vec![class("C", "a")]).expect("non-empty observation");
        let mut oracle = TestOracle::new(
            vec![rule(&[class("A", "a")], &[class("C", "a")])],
            &observation,
        );
        let universe: AxiomSet = [class("A", "a")].into_iter().collect();
        let mut extractor = ModelExtractor::default();

        assert!(!extractor
            .probe(&mut oracle, &universe, &universe)
            .expect("the test oracle does not fail"));
        assert!(extractor.latest_covering(&AxiomSet::new()).is_none());
    }
}

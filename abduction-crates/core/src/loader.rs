//! Access to the problem definition: the observation and the declared abducibles.

use std::sync::Arc;

use crate::basic_types::Axiom;
use crate::basic_types::AxiomSet;
use crate::basic_types::Observation;
use crate::options::SolverOptions;

/// The abducibles as declared by the user.
#[derive(Clone, Debug)]
pub enum Abducibles {
    /// Every assertion over the given symbols and individuals is abducible.
    Symbols {
        classes: Vec<Arc<str>>,
        roles: Vec<Arc<str>>,
        individuals: Vec<Arc<str>>,
    },
    /// Exactly the given axioms are abducible.
    Axioms(AxiomSet),
}

/// Provides the parts of an abduction problem which the solver needs besides the oracle.
pub trait Loader {
    fn abducibles(&self) -> &Abducibles;

    fn observation(&self) -> &Observation;

    /// The axioms whose disjunction is the negated observation.
    fn negated_observation(&self) -> Vec<Axiom> {
        self.observation().negated()
    }

    fn is_axiom_based_abducibles_provided(&self) -> bool {
        matches!(self.abducibles(), Abducibles::Axioms(_))
    }

    fn is_multi_observation(&self) -> bool {
        self.observation().is_multi_observation()
    }

    /// The set of axioms the solver may hypothesise under the given options.
    fn abducible_universe(&self, options: &SolverOptions) -> AxiomSet {
        build_universe(self.abducibles(), self.observation(), options)
    }
}

/// A [`Loader`] over an already constructed problem.
#[derive(Clone, Debug)]
pub struct AbductionInput {
    pub abducibles: Abducibles,
    pub observation: Observation,
}

impl Loader for AbductionInput {
    fn abducibles(&self) -> &Abducibles {
        &self.abducibles
    }

    fn observation(&self) -> &Observation {
        &self.observation
    }
}

fn build_universe(
    abducibles: &Abducibles,
    observation: &Observation,
    options: &SolverOptions,
) -> AxiomSet {
    let mut universe = match abducibles {
        Abducibles::Axioms(axioms) => axioms.clone(),
        Abducibles::Symbols {
            classes,
            roles,
            individuals,
        } => {
            let mut universe = AxiomSet::new();

            for class in classes {
                for individual in individuals {
                    let assertion =
                        Axiom::class_assertion(Arc::clone(class), Arc::clone(individual));
                    if options.negation_allowed {
                        universe.add(assertion.complement());
                    }
                    universe.add(assertion);
                }
            }

            if options.roles_allowed {
                for role in roles {
                    for subject in individuals {
                        for object in individuals {
                            if subject == object && !options.loops_allowed {
                                continue;
                            }

                            let assertion = Axiom::role_assertion(
                                Arc::clone(role),
                                Arc::clone(subject),
                                Arc::clone(object),
                            );
                            if options.negation_allowed {
                                universe.add(assertion.complement());
                            }
                            universe.add(assertion);
                        }
                    }
                }
            }

            universe
        }
    };

    if !observation.is_multi_observation() || options.strict_relevance {
        universe.remove_all(observation.components());
    }

    universe
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<Arc<str>> {
        names.iter().map(|name| Arc::from(*name)).collect()
    }

    fn input(abducibles: Abducibles, observation: Vec<Axiom>) -> AbductionInput {
        AbductionInput {
            abducibles,
            observation: Observation::new(observation).expect("non-empty observation"),
        }
    }

    #[test]
    fn symbols_are_expanded_over_individuals_with_complements() {
        let loader = input(
            Abducibles::Symbols {
                classes: names(&["A", "B"]),
                roles: vec![],
                individuals: names(&["a", "b"]),
            },
            vec![Axiom::class_assertion("C", "a")],
        );

        let universe = loader.abducible_universe(&SolverOptions::default());
        assert_eq!(8, universe.len());
        assert!(universe.contains(&Axiom::class_assertion("B", "b").negate()));
    }

    #[test]
    fn single_observation_is_never_abducible() {
        let loader = input(
            Abducibles::Symbols {
                classes: names(&["A"]),
                roles: vec![],
                individuals: names(&["a"]),
            },
            vec![Axiom::class_assertion("A", "a")],
        );

        let options = SolverOptions {
            negation_allowed: false,
            strict_relevance: false,
            ..SolverOptions::default()
        };
        assert!(loader.abducible_universe(&options).is_empty());
    }

    #[test]
    fn multi_observation_components_are_removed_only_under_strict_relevance() {
        let loader = input(
            Abducibles::Axioms(
                [
                    Axiom::class_assertion("A", "a"),
                    Axiom::class_assertion("B", "a"),
                    Axiom::class_assertion("C", "a"),
                ]
                .into_iter()
                .collect(),
            ),
            vec![
                Axiom::class_assertion("A", "a"),
                Axiom::class_assertion("B", "a"),
            ],
        );
        assert!(loader.is_axiom_based_abducibles_provided());
        assert!(loader.is_multi_observation());

        let strict = SolverOptions::default();
        assert_eq!(1, loader.abducible_universe(&strict).len());

        let lenient = SolverOptions {
            strict_relevance: false,
            ..SolverOptions::default()
        };
        assert_eq!(3, loader.abducible_universe(&lenient).len());
    }

    #[test]
    fn roles_respect_the_loop_setting() {
        let loader = input(
            Abducibles::Symbols {
                classes: vec![],
                roles: names(&["R"]),
                individuals: names(&["a", "b"]),
            },
            vec![Axiom::class_assertion("C", "a")],
        );

        let without_roles = SolverOptions::default();
        assert!(loader.abducible_universe(&without_roles).is_empty());

        let with_loops = SolverOptions {
            roles_allowed: true,
            negation_allowed: false,
            ..SolverOptions::default()
        };
        assert_eq!(4, loader.abducible_universe(&with_loops).len());

        let without_loops = SolverOptions {
            loops_allowed: false,
            ..with_loops
        };
        let universe = loader.abducible_universe(&without_loops);
        assert_eq!(2, universe.len());
        assert!(!universe.contains(&Axiom::role_assertion("R", "a", "a")));
    }
}

use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Arc;

/// An atomic, possibly negated, assertion about named individuals.
///
/// Unary axioms are class assertions (`A(a)`), binary axioms are role assertions (`R(a,b)`).
/// Axioms are immutable; equality and hashing only depend on the predicate, the arguments and the
/// polarity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Axiom {
    predicate: Arc<str>,
    arguments: Box<[Arc<str>]>,
    negated: bool,
}

impl Axiom {
    pub fn new(
        predicate: impl Into<Arc<str>>,
        arguments: impl IntoIterator<Item = Arc<str>>,
        negated: bool,
    ) -> Axiom {
        Axiom {
            predicate: predicate.into(),
            arguments: arguments.into_iter().collect(),
            negated,
        }
    }

    /// Creates the positive class assertion `class(individual)`.
    pub fn class_assertion(class: impl Into<Arc<str>>, individual: impl Into<Arc<str>>) -> Axiom {
        Axiom::new(class, [individual.into()], false)
    }

    /// Creates the positive role assertion `role(subject,object)`.
    pub fn role_assertion(
        role: impl Into<Arc<str>>,
        subject: impl Into<Arc<str>>,
        object: impl Into<Arc<str>>,
    ) -> Axiom {
        Axiom::new(role, [subject.into(), object.into()], false)
    }

    /// Returns the axiom with the opposite polarity.
    pub fn complement(&self) -> Axiom {
        Axiom {
            predicate: Arc::clone(&self.predicate),
            arguments: self.arguments.clone(),
            negated: !self.negated,
        }
    }

    /// Returns the negative version of this axiom.
    pub fn negate(self) -> Axiom {
        Axiom {
            negated: true,
            ..self
        }
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn arguments(&self) -> &[Arc<str>] {
        &self.arguments
    }

    /// The individuals the axiom talks about, in order.
    pub fn subject(&self) -> &[Arc<str>] {
        self.arguments()
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_class_assertion(&self) -> bool {
        self.arguments.len() == 1
    }

    /// Whether `other` asserts the same fact with the opposite polarity.
    pub fn clashes_with(&self, other: &Axiom) -> bool {
        self.negated != other.negated
            && self.predicate == other.predicate
            && self.arguments == other.arguments
    }
}

impl Display for Axiom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            write!(f, "¬")?;
        }

        write!(f, "{}({})", self.predicate, self.arguments.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complement_flips_polarity_only() {
        let axiom = Axiom::class_assertion("A", "a");
        let complement = axiom.complement();

        assert!(complement.is_negated());
        assert_eq!(axiom.predicate(), complement.predicate());
        assert_eq!(axiom, complement.complement());
        assert!(axiom.clashes_with(&complement));
    }

    #[test]
    fn display_uses_negation_sign() {
        assert_eq!("¬A(a)", Axiom::class_assertion("A", "a").negate().to_string());
        assert_eq!(
            "R(a,b)",
            Axiom::role_assertion("R", "a", "b").to_string()
        );
    }

    #[test]
    fn different_subjects_do_not_clash() {
        let first = Axiom::class_assertion("A", "a");
        let second = Axiom::class_assertion("A", "b").negate();

        assert!(!first.clashes_with(&second));
    }
}

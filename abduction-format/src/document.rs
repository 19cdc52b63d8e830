use std::fmt::Display;
use std::fmt::Formatter;
use std::rc::Rc;

/// A term in a literal: either a named individual or a variable (written `?x`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    Individual(Rc<str>),
    Variable(Rc<str>),
}

impl Term {
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Individual(name) => write!(f, "{name}"),
            Term::Variable(name) => write!(f, "?{name}"),
        }
    }
}

/// A possibly negated atom `Name(t1, ..., tn)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    pub predicate: Rc<str>,
    pub terms: Vec<Term>,
    pub negated: bool,
}

impl Literal {
    /// Whether the literal mentions no variables.
    pub fn is_ground(&self) -> bool {
        self.terms.iter().all(|term| !term.is_variable())
    }

    pub fn arity(&self) -> usize {
        self.terms.len()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            write!(f, "¬")?;
        }

        write!(f, "{}(", self.predicate)?;
        for (idx, term) in self.terms.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{term}")?;
        }
        write!(f, ")")
    }
}

/// A rule `b1 & ... & bn -> h1 | ... | hm`.
///
/// A fact is a rule with an empty body, and a rule with an empty head states that its body can
/// never hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub body: Vec<Literal>,
    pub head: Vec<Literal>,
}

impl Rule {
    pub fn fact(literal: Literal) -> Rule {
        Rule {
            body: vec![],
            head: vec![literal],
        }
    }
}

/// The abducibles declared in a knowledge-base file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbducibleDeclaration {
    /// No declaration was present; every symbol of the knowledge base is abducible.
    AllSymbols,
    /// `a` lines: the listed predicate symbols are abducible over all individuals.
    Symbols(Vec<Rc<str>>),
    /// `x` lines: exactly the listed ground literals are abducible.
    Literals(Vec<Literal>),
}

/// The parsed contents of a knowledge-base file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnowledgeBaseDocument {
    /// All individuals, in order of first occurrence.
    pub individuals: Vec<Rc<str>>,
    pub rules: Vec<Rule>,
    /// The conjunction of literals which should be explained.
    pub observation: Vec<Literal>,
    pub abducibles: AbducibleDeclaration,
}

impl KnowledgeBaseDocument {
    /// Returns the arity with which `symbol` is used in the rules or the observation, if it is
    /// used at all.
    pub fn arity_of(&self, symbol: &str) -> Option<usize> {
        self.rules
            .iter()
            .flat_map(|rule| rule.body.iter().chain(rule.head.iter()))
            .chain(self.observation.iter())
            .find(|literal| &*literal.predicate == symbol)
            .map(Literal::arity)
    }

    /// All predicate symbols with their arity, in order of first occurrence.
    pub fn symbols(&self) -> Vec<(Rc<str>, usize)> {
        let mut symbols: Vec<(Rc<str>, usize)> = vec![];

        for literal in self
            .rules
            .iter()
            .flat_map(|rule| rule.body.iter().chain(rule.head.iter()))
            .chain(self.observation.iter())
        {
            if !symbols.iter().any(|(name, _)| *name == literal.predicate) {
                symbols.push((Rc::clone(&literal.predicate), literal.arity()));
            }
        }

        symbols
    }
}

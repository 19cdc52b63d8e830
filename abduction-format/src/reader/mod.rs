//! Implements the parsing of knowledge-base files.
//!
//! See [`KnowledgeBaseReader`] for information on how to parse a `.kb` file.

mod error;
mod parser;

use std::collections::HashSet;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::rc::Rc;

pub use error::Error;
use parser::LineParser;
use parser::Statement;

use crate::AbducibleDeclaration;
use crate::KnowledgeBaseDocument;
use crate::Literal;
use crate::Rule;
use crate::Term;

/// Used to read and parse knowledge-base files.
///
/// The format is line based. Every non-empty line starts with a keyword:
/// - `i` declares individuals,
/// - `f` states a fact,
/// - `r` states a rule `body -> head`, where the body is a conjunction (`&`) and the head a
///   disjunction (`|`) of literals,
/// - `o` gives the observation, a conjunction of ground literals,
/// - `a` lists abducible symbols,
/// - `x` lists abducible ground literals.
///
/// Literals are negated with `!` or `¬`, variables are written `?x`, and a `#` starts a comment.
/// Individuals which occur in ground literals are declared implicitly.
///
/// # Example
/// ```
/// use abduction_format::reader::KnowledgeBaseReader;
/// use abduction_format::AbducibleDeclaration;
///
/// let source = r#"
/// ## Everybody who is a grandfather is a father.
/// i jack
/// r Grandfather(?x) -> Father(?x)
/// r Male(?x) & Female(?x) ->
/// o Father(jack)
/// a Grandfather
/// "#;
///
/// let document = KnowledgeBaseReader::new(source.as_bytes())
///     .read()
///     .expect("valid knowledge base");
///
/// assert_eq!(2, document.rules.len());
/// assert!(document.rules[1].head.is_empty());
/// assert_eq!("Father(jack)", document.observation[0].to_string());
/// assert!(matches!(document.abducibles, AbducibleDeclaration::Symbols(_)));
/// ```
#[derive(Debug)]
pub struct KnowledgeBaseReader<R> {
    source: BufReader<R>,
    identifiers: HashSet<Rc<str>>,
}

impl<R: Read> KnowledgeBaseReader<R> {
    /// Construct a new reader which reads from `source`.
    pub fn new(source: R) -> KnowledgeBaseReader<R> {
        KnowledgeBaseReader {
            source: BufReader::new(source),
            identifiers: HashSet::new(),
        }
    }

    /// Read the complete source into a [`KnowledgeBaseDocument`].
    pub fn read(mut self) -> Result<KnowledgeBaseDocument, Error> {
        let mut builder = DocumentBuilder::default();
        let mut line = Vec::new();
        let mut line_nr = 0;

        loop {
            line.clear();
            let read_bytes = self.source.read_until(b'\n', &mut line)?;

            if read_bytes == 0 {
                // The end of the file has been reached.
                break;
            }
            line_nr += 1;

            let parser = LineParser::new(&line, line_nr, &mut self.identifiers);
            if let Some(statement) = parser.parse()? {
                builder.add(statement, line_nr)?;
            }
        }

        builder.finish()
    }
}

/// Parse a knowledge base held in memory.
pub fn parse_knowledge_base(source: &str) -> Result<KnowledgeBaseDocument, Error> {
    KnowledgeBaseReader::new(source.as_bytes()).read()
}

#[derive(Debug, Default)]
struct DocumentBuilder {
    individuals: Vec<Rc<str>>,
    rules: Vec<Rule>,
    observation: Option<Vec<Literal>>,
    abducible_symbols: Vec<Rc<str>>,
    abducible_literals: Vec<Literal>,
}

impl DocumentBuilder {
    fn add(&mut self, statement: Statement, line_nr: usize) -> Result<(), Error> {
        match statement {
            Statement::Individuals(individuals) => {
                individuals
                    .into_iter()
                    .for_each(|individual| self.declare(individual));
            }
            Statement::Rule(rule) => {
                rule.body
                    .iter()
                    .chain(rule.head.iter())
                    .for_each(|literal| self.declare_from(literal));
                self.rules.push(rule);
            }
            Statement::Observation(literals) => {
                if self.observation.is_some() {
                    return Err(Error::DuplicateObservation { line_nr });
                }
                literals.iter().for_each(|literal| self.declare_from(literal));
                self.observation = Some(literals);
            }
            Statement::AbducibleSymbols(symbols) => self.abducible_symbols.extend(symbols),
            Statement::AbducibleLiterals(literals) => {
                literals.iter().for_each(|literal| self.declare_from(literal));
                self.abducible_literals.extend(literals);
            }
        }

        Ok(())
    }

    fn declare_from(&mut self, literal: &Literal) {
        for term in literal.terms.iter() {
            if let Term::Individual(name) = term {
                self.declare(Rc::clone(name));
            }
        }
    }

    fn declare(&mut self, individual: Rc<str>) {
        if !self.individuals.contains(&individual) {
            self.individuals.push(individual);
        }
    }

    fn finish(self) -> Result<KnowledgeBaseDocument, Error> {
        let observation = self.observation.ok_or(Error::MissingObservation)?;

        let abducibles = if !self.abducible_literals.is_empty() {
            AbducibleDeclaration::Literals(self.abducible_literals)
        } else if !self.abducible_symbols.is_empty() {
            AbducibleDeclaration::Symbols(self.abducible_symbols)
        } else {
            AbducibleDeclaration::AllSymbols
        };

        Ok(KnowledgeBaseDocument {
            individuals: self.individuals,
            rules: self.rules,
            observation,
            abducibles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_with_negation_and_disjunction() {
        let source = "r ¬B(?x) & !C(?x) -> A(?x) | D(?x)\no A(a)\n";
        let document = parse_knowledge_base(source).expect("valid knowledge base");

        let rule = &document.rules[0];
        assert_eq!(2, rule.body.len());
        assert!(rule.body.iter().all(|literal| literal.negated));
        assert_eq!(2, rule.head.len());
        assert_eq!("¬B(?x)", rule.body[0].to_string());
        assert_eq!("D(?x)", rule.head[1].to_string());
    }

    #[test]
    fn rule_with_empty_body_and_empty_head() {
        let source = "r -> A(a)\nr A(?x) & B(?x) ->\no C(a)\n";
        let document = parse_knowledge_base(source).expect("valid knowledge base");

        assert!(document.rules[0].body.is_empty());
        assert!(document.rules[1].head.is_empty());
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let source = "# a comment\n\n   \nf A(a) # trailing\no B(a)\n";
        let document = parse_knowledge_base(source).expect("valid knowledge base");

        assert_eq!(1, document.rules.len());
        assert_eq!(vec![Rc::<str>::from("a")], document.individuals);
    }

    #[test]
    fn individuals_are_declared_in_order_of_occurrence() {
        let source = "i jane\nf Parent(jack,jane)\no Father(jack)\n";
        let document = parse_knowledge_base(source).expect("valid knowledge base");

        let names = document
            .individuals
            .iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>();
        assert_eq!(vec!["jane", "jack"], names);
    }

    #[test]
    fn abducible_literals_override_symbols() {
        let source = "o A(a)\na B C\nx B(a) !C(a)\n";
        let document = parse_knowledge_base(source).expect("valid knowledge base");

        match document.abducibles {
            AbducibleDeclaration::Literals(literals) => {
                assert_eq!(2, literals.len());
                assert!(literals[1].negated);
            }
            other => panic!("expected abducible literals, got {other:?}"),
        }
    }

    #[test]
    fn missing_declarations_mean_all_symbols() {
        let document = parse_knowledge_base("o A(a)\n").expect("valid knowledge base");
        assert_eq!(AbducibleDeclaration::AllSymbols, document.abducibles);
    }

    #[test]
    fn unknown_keyword_is_reported_with_line_number() {
        let result = parse_knowledge_base("o A(a)\nz B(a)\n");

        match result {
            Err(Error::ParseError { line_nr, span, .. }) => {
                assert_eq!(2, line_nr);
                assert_eq!((0, 1), span);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_literal_is_an_error() {
        let result = parse_knowledge_base("o A(a\n");
        assert!(matches!(result, Err(Error::ParseError { line_nr: 1, .. })));
    }

    #[test]
    fn observation_with_variables_is_rejected() {
        let result = parse_knowledge_base("o A(?x)\n");
        assert!(matches!(
            result,
            Err(Error::NonGroundLiteral { line_nr: 1, .. })
        ));
    }

    #[test]
    fn observation_is_required_exactly_once() {
        assert!(matches!(
            parse_knowledge_base("f A(a)\n"),
            Err(Error::MissingObservation)
        ));
        assert!(matches!(
            parse_knowledge_base("o A(a)\no B(a)\n"),
            Err(Error::DuplicateObservation { line_nr: 2 })
        ));
    }

    #[test]
    fn identifiers_are_interned() {
        let document =
            parse_knowledge_base("f A(a)\nf B(a)\no A(a)\n").expect("valid knowledge base");

        let Term::Individual(first) = &document.rules[0].head[0].terms[0] else {
            panic!("expected an individual");
        };
        let Term::Individual(second) = &document.rules[1].head[0].terms[0] else {
            panic!("expected an individual");
        };
        assert!(Rc::ptr_eq(first, second));
    }
}

use std::collections::HashSet;
use std::iter::Copied;
use std::iter::Peekable;
use std::rc::Rc;
use std::slice::Iter;

use crate::Literal;
use crate::Rule;
use crate::Term;
use crate::reader::Error;

/// The UTF-8 encoding of `¬`.
const NEGATION_SIGN: [u8; 2] = [0xC2, 0xAC];

/// The content of a single non-empty line.
#[derive(Debug)]
pub(super) enum Statement {
    Individuals(Vec<Rc<str>>),
    Rule(Rule),
    Observation(Vec<Literal>),
    AbducibleSymbols(Vec<Rc<str>>),
    AbducibleLiterals(Vec<Literal>),
}

/// Parses a single line to possibly return a statement.
///
/// See [`LineParser::parse`] for more information.
pub(super) struct LineParser<'src, 'data> {
    source: &'src [u8],
    bytes: Peekable<Copied<Iter<'src, u8>>>,
    position: usize,
    line_nr: usize,

    identifiers: &'data mut HashSet<Rc<str>>,
}

impl<'src, 'data> LineParser<'src, 'data> {
    pub(super) fn new(
        line: &'src [u8],
        line_nr: usize,
        identifiers: &'data mut HashSet<Rc<str>>,
    ) -> Self {
        // Everything after a '#' is a comment.
        let end = line
            .iter()
            .position(|byte| *byte == b'#' || *byte == b'\n' || *byte == b'\r')
            .unwrap_or(line.len());

        let stripped_line = &line[..end];

        LineParser {
            position: 0,
            source: stripped_line,
            bytes: stripped_line.iter().copied().peekable(),
            line_nr,
            identifiers,
        }
    }

    /// Parses a single line from a knowledge-base file.
    ///
    /// The line may be empty (or only contain a comment), in which case this returns
    /// `Ok(None)`. Otherwise it either successfully parses a statement or returns a parser
    /// error.
    pub(super) fn parse(mut self) -> Result<Option<Statement>, Error> {
        loop {
            match self.next() {
                None => return Ok(None),

                Some(byte) if byte.is_ascii_whitespace() => {
                    continue;
                }

                Some(b'i') => {
                    return self
                        .parse_identifier_list()
                        .map(Statement::Individuals)
                        .map(Some)
                }
                Some(b'f') => return self.parse_fact().map(Some),
                Some(b'r') => return self.parse_rule().map(Some),
                Some(b'o') => return self.parse_observation().map(Some),
                Some(b'a') => {
                    return self
                        .parse_identifier_list()
                        .map(Statement::AbducibleSymbols)
                        .map(Some)
                }
                Some(b'x') => return self.parse_abducible_literals().map(Some),

                Some(byte) => {
                    return Err(Error::ParseError {
                        line_nr: self.line_nr,
                        reason: if byte.is_ascii() {
                            format!("expected i, f, r, o, a, or x. got '{}'", byte as char)
                        } else {
                            "expected i, f, r, o, a, or x".to_owned()
                        },
                        span: (self.position - 1, self.position),
                    });
                }
            }
        }
    }

    /// Parses a line in the following shape:
    /// ```ignored
    /// ("i" | "a") (<identifier>)+
    /// ```
    fn parse_identifier_list(&mut self) -> Result<Vec<Rc<str>>, Error> {
        self.consume_separator()?;

        let mut identifiers = vec![];
        while self.peek().is_some() {
            let identifier = self.consume_identifier()?;
            identifiers.push(self.intern(identifier));
            self.consume_optional_whitespace();
        }

        if identifiers.is_empty() {
            return Err(self.error_here("unexpected input: expected identifier - got EOF"));
        }

        Ok(identifiers)
    }

    /// Parses a line in the following shape:
    /// ```ignored
    /// "f" <literal>
    /// ```
    fn parse_fact(&mut self) -> Result<Statement, Error> {
        self.consume_separator()?;
        let literal = self.consume_literal()?;
        self.consume_end()?;

        Ok(Statement::Rule(Rule::fact(literal)))
    }

    /// Parses a line in the following shape:
    /// ```ignored
    /// "r" (<literal> ("&" <literal>)*)? "->" (<literal> ("|" <literal>)*)?
    /// ```
    fn parse_rule(&mut self) -> Result<Statement, Error> {
        self.consume_separator()?;

        let body = if self.peek() == Some(b'-') {
            vec![]
        } else {
            self.consume_literal_sequence(b'&')?
        };

        self.consume_str("->")?;
        self.consume_optional_whitespace();

        let head = if self.peek().is_none() {
            vec![]
        } else {
            self.consume_literal_sequence(b'|')?
        };
        self.consume_end()?;

        Ok(Statement::Rule(Rule { body, head }))
    }

    /// Parses a line in the following shape:
    /// ```ignored
    /// "o" <literal> ("&" <literal>)*
    /// ```
    fn parse_observation(&mut self) -> Result<Statement, Error> {
        self.consume_separator()?;
        let literals = self.consume_literal_sequence(b'&')?;
        self.consume_end()?;

        self.ensure_ground(&literals)?;

        Ok(Statement::Observation(literals))
    }

    /// Parses a line in the following shape:
    /// ```ignored
    /// "x" (<literal>)+
    /// ```
    fn parse_abducible_literals(&mut self) -> Result<Statement, Error> {
        self.consume_separator()?;

        let mut literals = vec![];
        while self.peek().is_some() {
            literals.push(self.consume_literal()?);
            self.consume_optional_whitespace();
        }

        if literals.is_empty() {
            return Err(self.error_here("unexpected input: expected literal - got EOF"));
        }

        self.ensure_ground(&literals)?;

        Ok(Statement::AbducibleLiterals(literals))
    }

    fn ensure_ground(&self, literals: &[Literal]) -> Result<(), Error> {
        match literals.iter().find(|literal| !literal.is_ground()) {
            Some(literal) => Err(Error::NonGroundLiteral {
                line_nr: self.line_nr,
                literal: literal.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Parses literals separated by `separator`, stopping at the first position where no
    /// separator follows.
    fn consume_literal_sequence(&mut self, separator: u8) -> Result<Vec<Literal>, Error> {
        let mut literals = vec![self.consume_literal()?];

        loop {
            self.consume_optional_whitespace();

            if self.peek() != Some(separator) {
                break;
            }
            let _ = self.next();
            self.consume_optional_whitespace();

            literals.push(self.consume_literal()?);
        }

        Ok(literals)
    }

    /// Parses a literal in the following shape:
    /// ```ignored
    /// ("!" | "¬")? <identifier> "(" <term> ("," <term>)* ")"
    ///
    /// term := "?" <identifier> | <identifier>
    /// ```
    fn consume_literal(&mut self) -> Result<Literal, Error> {
        let negated = match self.peek() {
            Some(b'!') => {
                let _ = self.next();
                true
            }
            Some(byte) if byte == NEGATION_SIGN[0] => {
                self.consume_bytes(&NEGATION_SIGN, "¬")?;
                true
            }
            _ => false,
        };

        let predicate = self.consume_identifier()?;
        let predicate = self.intern(predicate);

        self.consume_optional_whitespace();
        self.consume_str("(")?;

        let mut terms = vec![];
        loop {
            self.consume_optional_whitespace();
            terms.push(self.consume_term()?);
            self.consume_optional_whitespace();

            match self.consume("',' or ')'")? {
                b',' => continue,
                b')' => break,
                _ => {
                    return Err(Error::ParseError {
                        line_nr: self.line_nr,
                        reason: "unexpected input: expected ',' or ')'".to_owned(),
                        span: (self.position - 1, self.position),
                    });
                }
            }
        }

        Ok(Literal {
            predicate,
            terms,
            negated,
        })
    }

    fn consume_term(&mut self) -> Result<Term, Error> {
        if self.peek() == Some(b'?') {
            let _ = self.next();
            let name = self.consume_identifier()?;
            Ok(Term::Variable(self.intern(name)))
        } else {
            let name = self.consume_identifier()?;
            Ok(Term::Individual(self.intern(name)))
        }
    }

    fn consume_optional_whitespace(&mut self) {
        while self.peek().is_some_and(|byte| byte.is_ascii_whitespace()) {
            let _ = self.next();
        }
    }

    /// Consume at least one whitespace.
    fn consume_separator(&mut self) -> Result<(), Error> {
        let byte = self.consume("whitespace")?;

        if byte.is_ascii_whitespace() {
            self.consume_optional_whitespace();
            Ok(())
        } else {
            Err(Error::ParseError {
                line_nr: self.line_nr,
                reason: if byte.is_ascii() {
                    format!("expected whitespace. got '{}'", byte as char)
                } else {
                    "expected whitespace".to_owned()
                },
                span: (self.position - 1, self.position),
            })
        }
    }

    /// Ensure nothing but whitespace remains on the line.
    fn consume_end(&mut self) -> Result<(), Error> {
        self.consume_optional_whitespace();

        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.error_here("unexpected input: expected end of line")),
        }
    }

    /// Consume the next byte in the input.
    fn next(&mut self) -> Option<u8> {
        let byte = self.bytes.next()?;
        self.position += 1;
        Some(byte)
    }

    /// Look one byte ahead.
    fn peek(&mut self) -> Option<u8> {
        self.bytes.peek().copied()
    }

    /// Consume the next byte in the input, and error if it does not exist.
    fn consume(&mut self, expected: &str) -> Result<u8, Error> {
        self.next().ok_or_else(|| Error::ParseError {
            line_nr: self.line_nr,
            reason: format!("unexpected input: expected {expected} - got EOF"),
            span: (self.position, self.position + 1),
        })
    }

    fn consume_str(&mut self, literal: &str) -> Result<(), Error> {
        self.consume_bytes(literal.as_bytes(), literal)
    }

    fn consume_bytes(&mut self, expected: &[u8], description: &str) -> Result<(), Error> {
        let start = self.position;

        for byte in expected {
            let _ = self
                .next()
                .filter(|input_byte| input_byte == byte)
                .ok_or_else(|| Error::ParseError {
                    line_nr: self.line_nr,
                    reason: format!("unexpected input: expected {description}"),
                    span: (start, self.position),
                })?;
        }

        Ok(())
    }

    fn consume_identifier(&mut self) -> Result<&'src str, Error> {
        let is_identifier_char = |byte: u8| byte == b'_' || byte.is_ascii_alphanumeric();

        let start = self.position;

        while self.peek().is_some_and(is_identifier_char) {
            let _ = self.consume("identifier")?;
        }

        if start == self.position {
            return Err(Error::ParseError {
                line_nr: self.line_nr,
                reason: "unexpected input: expected identifier".to_owned(),
                span: (start, self.position + 1),
            });
        }

        std::str::from_utf8(&self.source[start..self.position]).map_err(|_| Error::ParseError {
            line_nr: self.line_nr,
            reason: "invalid utf8".to_owned(),
            span: (start, self.position),
        })
    }

    fn error_here(&self, reason: &str) -> Error {
        Error::ParseError {
            line_nr: self.line_nr,
            reason: reason.to_owned(),
            span: (self.position, self.position + 1),
        }
    }

    fn intern(&mut self, string: &str) -> Rc<str> {
        match self.identifiers.get(string) {
            Some(string_ref) => Rc::clone(string_ref),
            None => {
                let string_ref = Rc::from(string);
                let _ = self.identifiers.insert(Rc::clone(&string_ref));
                string_ref
            }
        }
    }
}

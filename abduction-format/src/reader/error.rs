use std::io;

#[cfg(doc)]
use super::KnowledgeBaseReader;

/// The errors that can be encountered by the [`KnowledgeBaseReader`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read from source: {0}")]
    IoError(#[from] io::Error),

    #[error("failed to parse line {line_nr} {span:?}: {reason}")]
    ParseError {
        line_nr: usize,
        reason: String,
        span: (usize, usize),
    },

    #[error("literal {literal} on line {line_nr} must not contain variables")]
    NonGroundLiteral { line_nr: usize, literal: String },

    #[error("a second observation was given on line {line_nr}")]
    DuplicateObservation { line_nr: usize },

    #[error("the knowledge base does not contain an observation")]
    MissingObservation,
}

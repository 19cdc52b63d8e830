//! This crate contains abstractions for dealing with the files consumed and produced by the
//! abduction solver: knowledge-base (`.kb`) files, which describe the background knowledge, the
//! observation and the abducibles, and record files, which contain the explanations grouped by
//! depth or level.
//!
//! To read knowledge-base files see [`reader::KnowledgeBaseReader`], and to write records see
//! [`writer::RecordWriter`].

mod document;
mod record;

pub mod reader;
pub mod writer;

pub use document::*;
pub use record::*;

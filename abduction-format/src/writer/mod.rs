//! Implements the writing of explanation records.
//!
//! See [`RecordWriter`] for more information.

use std::io::BufWriter;
use std::io::Write;

use crate::Record;

/// Writes explanation logs to an underlying sink.
///
/// # Example
/// ```
/// # use abduction_format::Record;
/// # use abduction_format::writer::RecordWriter;
/// let mut log: Vec<u8> = Vec::new();
/// let mut writer = RecordWriter::new(&mut log);
///
/// writer
///     .log_record(&Record {
///         index: 1,
///         seconds: 0.5,
///         timed_out: false,
///         errored: false,
///         explanations: vec!["{A(a)}".to_owned()],
///     })
///     .unwrap();
/// writer.log_total_time(0.75).unwrap();
/// writer.flush().unwrap();
/// drop(writer);
///
/// let expected = "
/// 1;1;0.50;{{A(a)}}
/// 0.75
/// ";
/// assert_eq!(std::str::from_utf8(&log).unwrap(), expected.trim_start());
/// ```
#[derive(Debug)]
pub struct RecordWriter<W: Write> {
    /// The writer to the underlying sink.
    writer: BufWriter<W>,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(writer: W) -> Self {
        RecordWriter {
            writer: BufWriter::new(writer),
        }
    }

    /// Write a single depth or level record.
    pub fn log_record(&mut self, record: &Record) -> std::io::Result<()> {
        writeln!(self.writer, "{record}")
    }

    /// Write the closing line of a block of records, containing the total elapsed time.
    pub fn log_total_time(&mut self, seconds: f64) -> std::io::Result<()> {
        writeln!(self.writer, "{seconds:.2}")
    }

    /// Write the time at which an explanation was found, as `seconds;explanation`.
    pub fn log_acquire_time(
        &mut self,
        seconds: f64,
        explanation: impl std::fmt::Display,
    ) -> std::io::Result<()> {
        writeln!(self.writer, "{seconds:.2};{explanation}")
    }

    /// Write a free-form message line, e.g. the final status.
    pub fn log_message(&mut self, message: impl std::fmt::Display) -> std::io::Result<()> {
        writeln!(self.writer, "{message}")
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

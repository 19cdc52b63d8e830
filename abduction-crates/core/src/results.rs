use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;

use abduction_format::writer::RecordWriter;
use abduction_format::Record;

use crate::basic_types::Explanation;
use crate::engine::SearchStatistics;
use crate::statistics::log_statistic;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// How a run of the solver ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbductionStatus {
    /// The knowledge base already entails the observation, so there is nothing to explain.
    ObservationAlreadyEntailed,
    /// The search finished, possibly cut short by the depth limit or the time budget.
    Completed,
    /// The search was aborted by an error.
    Error(String),
}

impl Display for AbductionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AbductionStatus::ObservationAlreadyEntailed => {
                write!(f, "The observation is already entailed!")
            }
            AbductionStatus::Completed => write!(f, "Solving completed."),
            AbductionStatus::Error(message) => write!(f, "An error occurred: {message}"),
        }
    }
}

/// The outcome of a run: the final explanations and the logs describing how they were found.
#[derive(Clone, Debug)]
pub struct AbductionReport {
    pub status: AbductionStatus,
    /// The final explanations, ordered by size.
    pub explanations: Vec<Explanation>,
    /// One record per explanation size.
    pub depth_records: Vec<Record>,
    /// One record per tree depth at which explanations were discovered; only filled in by the
    /// hybrid strategy.
    pub level_records: Vec<Record>,
    /// The records written while the search was running, grouped by explanation size.
    pub partial_depth_records: Vec<Record>,
    /// The records written while the search was running, grouped by tree depth.
    pub partial_level_records: Vec<Record>,
    pub total_seconds: f64,
    /// Whether the search was stopped before the tree was exhausted.
    pub timed_out: bool,
    pub statistics: SearchStatistics,
}

impl AbductionReport {
    pub(crate) fn empty(status: AbductionStatus) -> AbductionReport {
        AbductionReport {
            status,
            explanations: Vec::new(),
            depth_records: Vec::new(),
            level_records: Vec::new(),
            partial_depth_records: Vec::new(),
            partial_level_records: Vec::new(),
            total_seconds: 0.0,
            timed_out: false,
            statistics: SearchStatistics::default(),
        }
    }

    /// Logs the statistics of the run, if statistic logging is configured.
    pub fn log_statistics(&self) {
        if !should_log_statistics() {
            return;
        }

        self.statistics.log(StatisticLogger::default());
        log_statistic("explanations", self.explanations.len());
        log_statistic("timedOut", self.timed_out);
        log_statistic_postfix();
    }

    /// Writes the final records: the records per size, the total time, and the time at which
    /// every explanation was found.
    pub fn write_records<W: Write>(&self, writer: &mut RecordWriter<W>) -> std::io::Result<()> {
        for record in &self.depth_records {
            writer.log_record(record)?;
        }
        writer.log_total_time(self.total_seconds)?;

        for explanation in &self.explanations {
            writer.log_acquire_time(explanation.acquire_time(), explanation)?;
        }

        if !self.level_records.is_empty() {
            for record in &self.level_records {
                writer.log_record(record)?;
            }
            writer.log_total_time(self.total_seconds)?;
        }

        writer.flush()
    }

    /// Writes the records which were produced while the search was running.
    pub fn write_partial_records<W: Write>(
        &self,
        writer: &mut RecordWriter<W>,
    ) -> std::io::Result<()> {
        for record in self
            .partial_depth_records
            .iter()
            .chain(&self.partial_level_records)
        {
            writer.log_record(record)?;
        }

        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Axiom;

    #[test]
    fn final_records_end_with_the_acquire_times() {
        let explanation = Explanation::new(
            [Axiom::class_assertion("A", "a")].into_iter().collect(),
            0,
            0.5,
        );
        let report = AbductionReport {
            explanations: vec![explanation],
            depth_records: vec![Record {
                index: 1,
                seconds: 0.5,
                timed_out: false,
                errored: false,
                explanations: vec!["{A(a)}".to_owned()],
            }],
            total_seconds: 1.0,
            ..AbductionReport::empty(AbductionStatus::Completed)
        };

        let mut output = Vec::new();
        let mut writer = RecordWriter::new(&mut output);
        report.write_records(&mut writer).expect("writing to memory");
        drop(writer);

        assert_eq!(
            "1;1;0.50;{{A(a)}}\n1.00\n0.50;{A(a)}\n",
            String::from_utf8(output).expect("valid utf-8")
        );
    }

    #[test]
    fn status_messages() {
        assert_eq!(
            "The observation is already entailed!",
            AbductionStatus::ObservationAlreadyEntailed.to_string()
        );
        assert_eq!("Solving completed.", AbductionStatus::Completed.to_string());
        assert_eq!(
            "An error occurred: reasoner crashed",
            AbductionStatus::Error("reasoner crashed".to_owned()).to_string()
        );
    }
}

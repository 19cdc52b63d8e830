use abduction_format::Record;
use fnv::FnvHashMap;
use log::debug;

use crate::basic_types::Explanation;
use crate::engine::RuleChecker;
use crate::engine::SearchStatistics;
use crate::oracle::ConsistencyOracle;
use crate::oracle::OracleError;
use crate::progress::ExplanationSink;
use crate::results::AbductionReport;
use crate::results::AbductionStatus;

/// Collects the explanations accepted during the search and turns them into the final report.
#[derive(Debug, Default)]
pub(crate) struct ExplanationManager {
    possible_explanations: Vec<Explanation>,
    /// The elapsed time at which every finished tree depth was logged.
    depth_times: FnvHashMap<usize, f64>,
    partial_depth_records: Vec<Record>,
    partial_level_records: Vec<Record>,
}

/// The information about a run which the final report needs besides the explanations.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RunSummary {
    pub(crate) hybrid: bool,
    pub(crate) depth_limit: Option<usize>,
    pub(crate) total_seconds: f64,
    pub(crate) timed_out: bool,
    pub(crate) statistics: SearchStatistics,
}

impl ExplanationManager {
    pub(crate) fn possible_explanations(&self) -> &[Explanation] {
        &self.possible_explanations
    }

    /// Accepts a candidate explanation; returns false if it was already known.
    pub(crate) fn add_possible_explanation(
        &mut self,
        explanation: Explanation,
        sink: &mut impl ExplanationSink,
    ) -> bool {
        if self.possible_explanations.contains(&explanation) {
            return false;
        }

        debug!(
            "Accepted explanation {explanation} at level {}",
            explanation.level()
        );
        sink.explanation_found(&explanation);
        self.possible_explanations.push(explanation);
        true
    }

    pub(crate) fn has_depth_time(&self, depth: usize) -> bool {
        self.depth_times.contains_key(&depth)
    }

    pub(crate) fn record_depth_time(&mut self, depth: usize, seconds: f64) {
        let _ = self.depth_times.insert(depth, seconds);
    }

    /// Logs the explanations accepted so far which have size `depth`.
    pub(crate) fn log_partial_depth(
        &mut self,
        depth: usize,
        seconds: f64,
        timed_out: bool,
        errored: bool,
    ) {
        let record = Self::record(
            depth,
            seconds,
            timed_out,
            errored,
            self.possible_explanations
                .iter()
                .filter(|explanation| explanation.depth() == depth),
        );
        debug!("Partial record: {record}");
        self.partial_depth_records.push(record);
    }

    /// Logs the explanations accepted so far which were found at tree depth `level`.
    pub(crate) fn log_partial_level(
        &mut self,
        level: usize,
        seconds: f64,
        timed_out: bool,
        errored: bool,
    ) {
        let record = Self::record(
            level,
            seconds,
            timed_out,
            errored,
            self.possible_explanations
                .iter()
                .filter(|explanation| explanation.level() == level),
        );
        self.partial_level_records.push(record);
    }

    fn record<'a>(
        index: usize,
        seconds: f64,
        timed_out: bool,
        errored: bool,
        explanations: impl IntoIterator<Item = &'a Explanation>,
    ) -> Record {
        Record {
            index,
            seconds,
            timed_out,
            errored,
            explanations: explanations
                .into_iter()
                .map(|explanation| explanation.to_string())
                .collect(),
        }
    }

    /// Builds the final report.
    ///
    /// The hybrid strategy can accept candidates which are not explanations or not minimal, so
    /// for it every candidate is checked against the knowledge base again, and per size the
    /// candidates which contain a smaller final explanation or are irrelevant are dropped.
    pub(crate) fn final_report<Oracle: ConsistencyOracle>(
        &self,
        oracle: &mut Oracle,
        rule_checker: &RuleChecker,
        status: AbductionStatus,
        summary: RunSummary,
    ) -> Result<AbductionReport, OracleError> {
        let candidates = if summary.hybrid {
            let mut consistent = Vec::new();
            for explanation in &self.possible_explanations {
                if RuleChecker::is_clash_free(explanation.axioms())
                    && RuleChecker::is_consistent(oracle, explanation.axioms())?
                {
                    consistent.push(explanation.clone());
                }
            }
            consistent
        } else {
            self.possible_explanations.clone()
        };

        Ok(self.build_report(candidates, Some(rule_checker), status, summary))
    }

    /// Builds a report from the accepted candidates without consulting the oracle again.
    pub(crate) fn unverified_report(
        &self,
        status: AbductionStatus,
        summary: RunSummary,
    ) -> AbductionReport {
        self.build_report(self.possible_explanations.clone(), None, status, summary)
    }

    fn build_report(
        &self,
        mut candidates: Vec<Explanation>,
        rule_checker: Option<&RuleChecker>,
        status: AbductionStatus,
        summary: RunSummary,
    ) -> AbductionReport {
        if let Some(limit) = summary.depth_limit {
            candidates.retain(|explanation| explanation.depth() <= limit);
        }

        let mut times = self.depth_times.clone();
        let mut explanations: Vec<Explanation> = Vec::new();
        let mut depth_records = Vec::new();

        let max_depth = candidates.iter().map(Explanation::depth).max().unwrap_or(0);
        for depth in 1..=max_depth {
            let mut current: Vec<Explanation> = candidates
                .iter()
                .filter(|explanation| explanation.depth() == depth)
                .cloned()
                .collect();

            if summary.hybrid {
                current.retain(|explanation| {
                    explanations
                        .iter()
                        .all(|accepted| !explanation.contains_all(accepted))
                });
                if let Some(rule_checker) = rule_checker {
                    current.retain(|explanation| rule_checker.is_relevant(explanation.axioms()));
                }
            }

            if current.is_empty() {
                continue;
            }

            let seconds = *times
                .entry(depth)
                .or_insert_with(|| latest_acquire_time(&current));
            depth_records.push(Self::record(depth, seconds, false, false, &current));
            explanations.extend(current);
        }

        let mut level_records = Vec::new();
        let max_level = explanations.iter().map(Explanation::level).max();
        if let (true, Some(max_level)) = (summary.hybrid, max_level) {
            for level in 0..=max_level {
                let current: Vec<&Explanation> = explanations
                    .iter()
                    .filter(|explanation| explanation.level() == level)
                    .collect();
                let seconds = *times
                    .entry(level)
                    .or_insert_with(|| latest_acquire_time(current.iter().copied()));
                level_records.push(Self::record(level, seconds, false, false, current));
            }
        }

        AbductionReport {
            status,
            explanations,
            depth_records,
            level_records,
            partial_depth_records: self.partial_depth_records.clone(),
            partial_level_records: self.partial_level_records.clone(),
            total_seconds: summary.total_seconds,
            timed_out: summary.timed_out,
            statistics: summary.statistics,
        }
    }
}

fn latest_acquire_time<'a>(explanations: impl IntoIterator<Item = &'a Explanation>) -> f64 {
    explanations
        .into_iter()
        .map(Explanation::acquire_time)
        .fold(0.0, f64::max)
}

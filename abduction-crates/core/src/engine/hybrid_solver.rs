use std::collections::VecDeque;
use std::fmt::Debug;
use std::time::Instant;

use fnv::FnvHashSet;
use log::debug;
use log::info;
use log::warn;

use super::model_extractor::ModelExtractor;
use super::model_node::ModelNode;
use super::path::Path;
use super::rule_checker::RuleChecker;
use super::set_divider::SetDivider;
use super::SearchStatistics;
use crate::basic_types::Axiom;
use crate::basic_types::AxiomSet;
use crate::basic_types::Explanation;
use crate::basic_types::Observation;
use crate::error::AbductionError;
use crate::error::SolveError;
use crate::explanations::ExplanationManager;
use crate::explanations::RunSummary;
use crate::loader::Loader;
use crate::options::ConflictCachingHeuristic;
use crate::options::SolverOptions;
use crate::oracle::ConsistencyOracle;
use crate::progress::ExplanationSink;
use crate::progress::ProgressSink;
use crate::progress::ProgressTracker;
use crate::results::AbductionReport;
use crate::results::AbductionStatus;
use crate::termination::Combinator;
use crate::termination::TerminationCondition;
use crate::termination::TimeBudget;

/// Enumerates the minimal explanations of an observation by building a hitting-set tree over
/// the abducibles.
///
/// With [`SearchStrategy::Hybrid`](crate::options::SearchStrategy::Hybrid) every node also runs
/// the MXP conflict search, which finds explanations of arbitrary size long before the tree
/// reaches that depth. With [`SearchStrategy::PureMhs`](crate::options::SearchStrategy::PureMhs)
/// explanations are only found as inconsistent paths of the tree.
///
/// # Example
/// ```ignore
/// let mut solver = HybridSolver::new(SolverOptions::default());
/// let report = solver.solve(&mut oracle, &input, &mut Indefinite, &mut (), &mut ())?;
/// for explanation in &report.explanations {
///     println!("{explanation}");
/// }
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct HybridSolver {
    options: SolverOptions,
}

impl HybridSolver {
    pub fn new(options: SolverOptions) -> HybridSolver {
        HybridSolver { options }
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Searches for the explanations of the observation of `loader`.
    ///
    /// The search stops when the tree is exhausted, when the depth limit is reached, when the
    /// configured timeout expires or when `termination` asks to stop; in all these cases the
    /// explanations found so far are reported. If the oracle fails, the explanations found
    /// before the failure are available from the returned [`SolveError`].
    pub fn solve<Oracle, Input, Termination, Progress, Sink>(
        &mut self,
        oracle: &mut Oracle,
        loader: &Input,
        termination: &mut Termination,
        progress: &mut Progress,
        sink: &mut Sink,
    ) -> Result<AbductionReport, SolveError>
    where
        Oracle: ConsistencyOracle,
        Input: Loader,
        Termination: TerminationCondition,
        Progress: ProgressSink,
        Sink: ExplanationSink,
    {
        for line in self.options.summary() {
            info!("{line}");
        }

        let universe = loader.abducible_universe(&self.options);
        info!("Observation: {}", loader.observation());
        info!("Abducibles: {}", universe.len());

        let budget = self.options.timeout.map(TimeBudget::starting_now);
        let mut search = Search::new(
            self.options,
            universe,
            loader.observation().clone(),
            oracle,
            Combinator::new(budget, termination),
            progress,
            sink,
        );

        let result = search.run();
        search
            .progress
            .update_progress(100.0, "Abduction finished.");
        result
    }
}

/// The state of a single run of the solver.
pub(crate) struct Search<'a, Oracle, Termination, Progress, Sink> {
    pub(crate) options: SolverOptions,
    pub(crate) universe: AxiomSet,
    pub(crate) rule_checker: RuleChecker,

    pub(crate) oracle: &'a mut Oracle,
    pub(crate) termination: Termination,
    pub(crate) progress: &'a mut Progress,
    pub(crate) sink: &'a mut Sink,
    pub(crate) tracker: ProgressTracker,

    /// The axioms currently assumed when probing the oracle.
    pub(crate) path: Path,
    pub(crate) models: ModelExtractor,
    pub(crate) divider: SetDivider,
    pub(crate) manager: ExplanationManager,
    pub(crate) statistics: SearchStatistics,

    /// The labels of the candidates considered at the current tree depth.
    pub(crate) paths_in_depth: FnvHashSet<AxiomSet>,
    pub(crate) current_depth: usize,
    pub(crate) start: Instant,
    pub(crate) timed_out: bool,
}

impl<Oracle, Termination, Progress, Sink> Debug for Search<'_, Oracle, Termination, Progress, Sink> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(std::any::type_name::<Self>())
            .field("current_depth", &self.current_depth)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<'a, Oracle, Termination, Progress, Sink> Search<'a, Oracle, Termination, Progress, Sink> {
    pub(crate) fn new(
        options: SolverOptions,
        universe: AxiomSet,
        observation: Observation,
        oracle: &'a mut Oracle,
        termination: Termination,
        progress: &'a mut Progress,
        sink: &'a mut Sink,
    ) -> Self {
        Search {
            options,
            rule_checker: RuleChecker::new(observation, options.strict_relevance),
            divider: SetDivider::new(options.conflict_caching),
            tracker: ProgressTracker::new(options.depth_limit, options.timeout),
            universe,
            oracle,
            termination,
            progress,
            sink,
            path: Path::default(),
            models: ModelExtractor::default(),
            manager: ExplanationManager::default(),
            statistics: SearchStatistics::default(),
            paths_in_depth: FnvHashSet::default(),
            current_depth: 0,
            start: Instant::now(),
            timed_out: false,
        }
    }
}

impl<Oracle, Termination, Progress, Sink> Search<'_, Oracle, Termination, Progress, Sink>
where
    Oracle: ConsistencyOracle,
    Termination: TerminationCondition,
    Progress: ProgressSink,
    Sink: ExplanationSink,
{
    fn run(&mut self) -> Result<AbductionReport, SolveError> {
        let entailed = match self.probe() {
            Ok(consistent) => !consistent,
            Err(error) => {
                let status = AbductionStatus::Error(error.to_string());
                return Err(SolveError::new(error, AbductionReport::empty(status)));
            }
        };

        if entailed {
            info!("The knowledge base already entails the observation");
            return self
                .finish(AbductionStatus::ObservationAlreadyEntailed)
                .map_err(|(error, report)| SolveError::new(error, report));
        }

        let expanded = self.expand_tree();
        debug_assert!(self.path.is_empty(), "every assumption is retracted");

        match expanded {
            Ok(()) => self
                .finish(AbductionStatus::Completed)
                .map_err(|(error, report)| SolveError::new(error, report)),
            Err(error) => {
                self.log_interrupted(false, true);
                let status = AbductionStatus::Error(error.to_string());
                let report = match self.finish(status) {
                    Ok(report) => report,
                    Err((_, report)) => report,
                };
                Err(SolveError::new(error, report))
            }
        }
    }

    fn expand_tree(&mut self) -> Result<(), AbductionError> {
        self.progress
            .update_progress(0.0, "Abduction initialized.");
        self.current_depth = 0;

        let mut queue = VecDeque::new();
        if let Some(root) = self.build_root()? {
            queue.push_back(root);
        }

        if self.is_timeout() {
            self.log_interrupted(true, false);
            return Ok(());
        }

        while let Some(node) = queue.pop_front() {
            if node.depth > self.current_depth {
                self.finish_depth();
                let elapsed = self.elapsed();
                let (percentage, message) =
                    self.tracker.depth_finished(self.current_depth, elapsed);
                self.progress.update_progress(percentage, &message);
                self.current_depth += 1;
            }

            if self.is_timeout() {
                self.log_interrupted(true, false);
                break;
            }

            if Some(node.depth) == self.options.depth_limit {
                break;
            }

            self.statistics.nodes_expanded += 1;
            debug!(
                "Expanding node {} at depth {} with {} edges",
                node.label,
                node.depth,
                node.data.len()
            );

            for axiom in node.data.to_sorted_vec() {
                if self.is_timeout() {
                    self.log_interrupted(true, false);
                    return Ok(());
                }

                if node.is_incorrect_edge(&axiom) {
                    continue;
                }

                let mut label = node.label.clone();
                label.add(axiom);
                let candidate = Explanation::new(label, self.current_depth, self.elapsed());

                if self.can_be_pruned(&candidate)? {
                    self.statistics.pruned_candidates += 1;
                    continue;
                }

                let new_conflicts = if self.options.model_reuse
                    && self.models.latest_covering(candidate.axioms()).is_some()
                {
                    self.statistics.model_reuses += 1;
                    Vec::new()
                } else {
                    if self.is_timeout() {
                        self.log_interrupted(true, false);
                        return Ok(());
                    }

                    if self.options.is_pure_mhs() {
                        if !self.probe_with(candidate.axioms())? {
                            self.accept(candidate)?;
                            continue;
                        }
                        Vec::new()
                    } else {
                        let new_conflicts = self.add_new_explanations(&node, candidate.axioms())?;
                        if self.is_timeout() {
                            self.log_interrupted(true, false);
                            return Ok(());
                        }
                        match new_conflicts {
                            Some(new_conflicts) => new_conflicts,
                            None => continue,
                        }
                    }
                };

                if let Some(child) =
                    self.create_child(&node, candidate.into_axioms(), &new_conflicts)?
                {
                    queue.push_back(child);
                }
            }
        }

        if !self.manager.has_depth_time(self.current_depth) {
            self.finish_depth();
        }

        Ok(())
    }

    /// Creates the root of the tree. The hybrid strategy first runs the conflict search over all
    /// abducibles.
    fn build_root(&mut self) -> Result<Option<ModelNode>, AbductionError> {
        if !self.options.is_pure_mhs() {
            self.statistics.conflict_searches += 1;
            let literals = self.universe.clone();
            let conflict = self.find_conflicts(&literals)?;
            for explanation in conflict.explanations {
                let _ = self
                    .manager
                    .add_possible_explanation(explanation, &mut *self.sink);
            }
        }

        let empty_path = AxiomSet::new();
        if self.models.latest_covering(&empty_path).is_none() && !self.probe()? {
            return Ok(None);
        }
        let Some(model) = self.models.latest_covering(&empty_path) else {
            return Ok(None);
        };
        let root_model = model.violated.clone();

        if root_model.is_empty() {
            return Ok(None);
        }
        Ok(Some(ModelNode::root(root_model)))
    }

    fn create_child(
        &mut self,
        parent: &ModelNode,
        label: AxiomSet,
        new_conflicts: &[Axiom],
    ) -> Result<Option<ModelNode>, AbductionError> {
        if self.models.latest_covering(&label).is_none() && !self.probe_with(&label)? {
            return Ok(None);
        }

        let Some(model) = self.models.latest_covering(&label) else {
            return Ok(None);
        };
        let data = model.violated.difference(&label);
        if data.is_empty() {
            return Ok(None);
        }

        Ok(Some(parent.child(label, data, new_conflicts)))
    }

    fn can_be_pruned(&mut self, candidate: &Explanation) -> Result<bool, AbductionError> {
        let axioms = candidate.axioms();
        if !RuleChecker::is_minimal(self.manager.possible_explanations(), axioms) {
            return Ok(true);
        }

        if !self.paths_in_depth.insert(axioms.clone()) {
            return Ok(true);
        }

        if self.options.is_pure_mhs() {
            if !self.rule_checker.is_relevant(axioms) {
                return Ok(true);
            }
            self.statistics.background_checks += 1;
            if !RuleChecker::is_consistent(&mut *self.oracle, axioms)? {
                return Ok(true);
            }
        } else if self.is_explanation(axioms)? {
            self.accept(candidate.clone())?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Whether `axioms` is free of clashes and refutes the negated observation. The model of
    /// this check is not stored.
    fn is_explanation(&mut self, axioms: &AxiomSet) -> Result<bool, AbductionError> {
        if !RuleChecker::is_clash_free(axioms) {
            return Ok(false);
        }

        self.statistics.consistency_checks += 1;
        Ok(!ModelExtractor::check(&mut *self.oracle, axioms)?)
    }

    /// Runs the conflict search below `label`; every conflict it finds, together with the
    /// label, is a candidate explanation.
    ///
    /// Returns the conflicts of a single axiom for the child node, or `None` if no child is
    /// needed because no conflicts or only conflicts of a single axiom were found.
    fn add_new_explanations(
        &mut self,
        node: &ModelNode,
        label: &AxiomSet,
    ) -> Result<Option<Vec<Axiom>>, AbductionError> {
        self.statistics.conflict_searches += 1;

        let literals = self
            .universe
            .difference(label)
            .difference(&node.length_one_conflicts);
        if self.options.conflict_caching == ConflictCachingHeuristic::LongestConflict {
            self.divider
                .reset_unused_explanations(self.manager.possible_explanations().len());
        }

        let conflict = self.with_assumed(label, |search| search.find_conflicts(&literals))?;

        let found = conflict.explanations.len();
        let mut length_one_conflicts = Vec::new();
        for explanation in conflict.explanations {
            if explanation.depth() == 1 {
                length_one_conflicts.extend(explanation.axioms().first().cloned());
            }

            let candidate = explanation.axioms().union(label);
            if RuleChecker::is_minimal(self.manager.possible_explanations(), &candidate) {
                self.accept(Explanation::new(
                    candidate,
                    explanation.level(),
                    explanation.acquire_time(),
                ))?;
            }
        }

        if found == length_one_conflicts.len() {
            return Ok(None);
        }
        Ok(Some(length_one_conflicts))
    }

    /// Adds an explanation to the possible explanations, after shrinking it when QuickXplain
    /// refinement is enabled.
    pub(crate) fn accept(&mut self, explanation: Explanation) -> Result<(), AbductionError> {
        let explanation = if self.options.qxp_refinement {
            self.refine(explanation)?
        } else {
            explanation
        };

        let pairs = (self.options.conflict_caching == ConflictCachingHeuristic::Median)
            .then(|| explanation.axioms().clone());
        if self
            .manager
            .add_possible_explanation(explanation, &mut *self.sink)
        {
            if let Some(pairs) = pairs {
                self.divider.record_pairs(&pairs);
            }
        }

        Ok(())
    }

    /// Logs the explanations of the finished tree depth and starts a new one.
    fn finish_depth(&mut self) {
        let seconds = self.elapsed();
        self.manager.record_depth_time(self.current_depth, seconds);
        self.manager
            .log_partial_depth(self.current_depth, seconds, false, false);
        if !self.options.is_pure_mhs() {
            self.manager
                .log_partial_level(self.current_depth, seconds, false, false);
        }
        self.paths_in_depth.clear();
        self.sink.level_finished();
    }

    /// Logs the explanations found so far after the search was cut short.
    fn log_interrupted(&mut self, timed_out: bool, errored: bool) {
        if timed_out {
            warn!(
                "The search was stopped at depth {} after {:.2}s",
                self.current_depth,
                self.elapsed()
            );
        }

        let seconds = self.elapsed();
        let depth = self.current_depth;
        self.manager.record_depth_time(depth, seconds);
        self.manager
            .log_partial_depth(depth, seconds, timed_out, errored);
        if !self.options.is_pure_mhs() {
            self.manager
                .log_partial_depth(depth + 1, seconds, timed_out, errored);
            self.manager
                .log_partial_level(depth, seconds, timed_out, errored);
        }
    }

    /// Builds the final report. If the oracle fails while checking the explanations, the
    /// unchecked report is returned along with the error.
    fn finish(
        &mut self,
        status: AbductionStatus,
    ) -> Result<AbductionReport, (AbductionError, AbductionReport)> {
        let total_seconds = self.elapsed();
        self.statistics.solve_time = total_seconds;
        let summary = RunSummary {
            hybrid: !self.options.is_pure_mhs(),
            depth_limit: self.options.depth_limit,
            total_seconds,
            timed_out: self.timed_out,
            statistics: self.statistics,
        };

        self.oracle.reset_to_original();
        match self
            .manager
            .final_report(&mut *self.oracle, &self.rule_checker, status, summary)
        {
            Ok(report) => {
                info!(
                    "Found {} explanations in {total_seconds:.2}s",
                    report.explanations.len()
                );
                Ok(report)
            }
            Err(error) => {
                let status = AbductionStatus::Error(error.to_string());
                let report = self.manager.unverified_report(status, summary);
                Err((error.into(), report))
            }
        }
    }

    pub(crate) fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Whether the search has to stop; once true, this stays true for the rest of the run.
    pub(crate) fn is_timeout(&mut self) -> bool {
        if !self.timed_out && self.termination.should_stop() {
            self.timed_out = true;
        }
        self.timed_out
    }

    /// Probes the oracle with the current path, storing the model if there is one.
    pub(crate) fn probe(&mut self) -> Result<bool, AbductionError> {
        self.statistics.consistency_checks += 1;
        Ok(self
            .models
            .probe(&mut *self.oracle, &self.universe, self.path.axioms())?)
    }

    /// Probes the oracle with `axioms` added to the current path.
    pub(crate) fn probe_with(&mut self, axioms: &AxiomSet) -> Result<bool, AbductionError> {
        self.with_assumed(axioms, |search| search.probe())
    }

    /// Runs `f` with `axioms` added to the path; they are removed again afterwards, whatever `f`
    /// returns.
    pub(crate) fn with_assumed<R>(
        &mut self,
        axioms: &AxiomSet,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let assumption = self.path.assume(axioms);
        let result = f(self);
        self.path.retract(assumption);
        result
    }
}

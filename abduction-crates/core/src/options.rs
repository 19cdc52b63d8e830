use std::fmt::Display;
use std::time::Duration;

/// How the hitting-set tree is explored.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SearchStrategy {
    /// Reiter-style minimal hitting-set enumeration, driven only by consistency checks.
    PureMhs,
    /// Hitting-set enumeration where every node additionally runs the MXP conflict search to
    /// discover explanations ahead of the tree.
    #[default]
    Hybrid,
}

impl Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStrategy::PureMhs => write!(f, "pure-mhs"),
            SearchStrategy::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// The bias used when splitting a set of literals during the conflict search.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ConflictCachingHeuristic {
    /// Split by alternation.
    #[default]
    None,
    /// Distribute the axioms of the longest explanation found so far over both halves first.
    LongestConflict,
    /// Separate axiom pairs which frequently occur together in explanations.
    Median,
}

impl Display for ConflictCachingHeuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictCachingHeuristic::None => write!(f, "none"),
            ConflictCachingHeuristic::LongestConflict => write!(f, "longest-conflict"),
            ConflictCachingHeuristic::Median => write!(f, "median"),
        }
    }
}

/// The configuration of a [`HybridSolver`](crate::HybridSolver) run. It is fixed when the solver
/// is created.
#[derive(Debug, Clone, Copy)]
pub struct SolverOptions {
    pub strategy: SearchStrategy,
    /// The maximal size of an explanation; `None` is unbounded.
    pub depth_limit: Option<usize>,
    /// The time budget of the search; `None` is unbounded.
    pub timeout: Option<Duration>,
    /// Whether complements of class assertions are abducible.
    pub negation_allowed: bool,
    /// Whether role assertions are abducible.
    pub roles_allowed: bool,
    /// Whether role assertions relating an individual to itself are abducible.
    pub loops_allowed: bool,
    /// Whether explanations may not contain (or be contradicted by) any single component of a
    /// multi-observation.
    pub strict_relevance: bool,
    /// Whether models found earlier are reused instead of asking the oracle again.
    pub model_reuse: bool,
    /// Whether every accepted explanation is shrunk to a minimal one with QuickXplain.
    pub qxp_refinement: bool,
    pub conflict_caching: ConflictCachingHeuristic,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::default(),
            depth_limit: None,
            timeout: None,
            negation_allowed: true,
            roles_allowed: false,
            loops_allowed: true,
            strict_relevance: true,
            model_reuse: true,
            qxp_refinement: false,
            conflict_caching: ConflictCachingHeuristic::default(),
        }
    }
}

impl SolverOptions {
    pub(crate) fn is_pure_mhs(&self) -> bool {
        self.strategy == SearchStrategy::PureMhs
    }

    /// A human readable summary, one setting per line.
    pub fn summary(&self) -> Vec<String> {
        let depth = self
            .depth_limit
            .map_or_else(|| "none".to_owned(), |depth| depth.to_string());
        let timeout = self
            .timeout
            .map_or_else(|| "none".to_owned(), |timeout| timeout.as_secs_f64().to_string());

        vec![
            format!("Strategy: {}", self.strategy),
            format!("Optimization QXP: {}", self.qxp_refinement),
            format!("Conflict caching: {}", self.conflict_caching),
            format!("Roles: {}", self.roles_allowed),
            format!("Looping allowed: {}", self.loops_allowed),
            format!("Negation: {}", self.negation_allowed),
            format!("Strict relevance: {}", self.strict_relevance),
            format!("Model reuse: {}", self.model_reuse),
            format!("Depth limit: {depth}"),
            format!("Timeout: {timeout}"),
        ]
    }
}

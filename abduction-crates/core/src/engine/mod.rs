//! The search for explanations: the hitting-set tree, the MXP conflict search and the pruning
//! rules they share.
mod conflict_finder;
mod hybrid_solver;
mod model_extractor;
mod model_node;
mod path;
mod rule_checker;
mod search_statistics;
mod set_divider;

pub use hybrid_solver::HybridSolver;
pub(crate) use rule_checker::RuleChecker;
pub use search_statistics::SearchStatistics;

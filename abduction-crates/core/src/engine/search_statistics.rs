use crate::create_statistics_struct;

create_statistics_struct!(
    /// Counters of the work done by a single run of the solver.
    SearchStatistics {
        /// The number of times the oracle was asked about the knowledge base, the negated
        /// observation and a path
        consistency_checks: u64,
        /// The number of times the oracle was asked about the knowledge base alone
        background_checks: u64,
        /// The number of tree nodes created from an earlier model instead of a new oracle call
        model_reuses: u64,
        /// The number of calls to the conflict search at tree nodes
        conflict_searches: u64,
        /// The number of conflicts extracted by the conflict search
        conflicts_found: u64,
        /// The number of candidates rejected by the pruning rules
        pruned_candidates: u64,
        /// The number of tree nodes which were expanded
        nodes_expanded: u64,
        /// The number of explanations shrunk by QuickXplain
        qxp_refinements: u64,
        /// The time spent solving, in seconds
        solve_time: f64,
});

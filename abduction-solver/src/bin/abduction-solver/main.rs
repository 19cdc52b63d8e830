mod os_signal_termination;
mod result;

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use abduction_solver::core::convert_case::Case;
use abduction_solver::core::statistics::configure_statistic_logging;
use abduction_solver::core::statistics::should_log_statistics;
use abduction_solver::core::statistics::Statistic;
use abduction_solver::core::statistics::StatisticLogger;
use abduction_solver::core::AbductionReport;
use abduction_solver::core::ConflictCachingHeuristic;
use abduction_solver::core::SearchStrategy;
use abduction_solver::core::SolverOptions;
use abduction_solver::format::writer::RecordWriter;
use abduction_solver::Instance;
use clap::Parser;
use log::error;
use log::info;
use log::warn;
use log::Level;
use log::LevelFilter;
use os_signal_termination::OsSignal;
use result::AbductionCliError;
use result::AbductionCliResult;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    /// The knowledge base to explain the observation of, given as a '*.kb' file.
    instance_path: PathBuf,

    /// How the hitting-set tree is explored.
    ///
    /// - "pure-mhs" only relies on consistency checks of the nodes of the tree
    /// - "hybrid" additionally runs the conflict search at every node, which finds explanations
    ///   ahead of the tree
    #[arg(long, value_enum, default_value_t, verbatim_doc_comment)]
    strategy: SearchStrategy,

    /// The maximal size of an explanation. When absent, explanations of any size are searched
    /// for.
    ///
    /// Possible values: usize (Optional)
    #[arg(short = 'd', long = "depth", verbatim_doc_comment)]
    depth_limit: Option<usize>,

    /// The time budget of the search, given in seconds. Once it is used up, the explanations
    /// found so far are reported.
    ///
    /// Possible values: u64 (Optional)
    #[arg(short = 't', long = "timeout", verbatim_doc_comment)]
    timeout: Option<u64>,

    /// Disallows negated class assertions as abducibles.
    ///
    /// Possible values: bool
    #[arg(long = "no-negation", verbatim_doc_comment)]
    no_negation: bool,

    /// Allows role assertions as abducibles.
    ///
    /// Possible values: bool
    #[arg(long = "roles", verbatim_doc_comment)]
    roles: bool,

    /// Disallows role assertions which relate an individual to itself.
    ///
    /// Possible values: bool
    #[arg(long = "no-loops", verbatim_doc_comment)]
    no_loops: bool,

    /// Allows explanations of a multi-observation to contain one of its components.
    ///
    /// Possible values: bool
    #[arg(long = "no-strict-relevance", verbatim_doc_comment)]
    no_strict_relevance: bool,

    /// Asks the oracle at every node instead of reusing the models found earlier.
    ///
    /// Possible values: bool
    #[arg(long = "no-model-reuse", verbatim_doc_comment)]
    no_model_reuse: bool,

    /// Shrinks every accepted explanation to a minimal one with QuickXplain.
    ///
    /// Possible values: bool
    #[arg(long = "qxp-refinement", verbatim_doc_comment)]
    qxp_refinement: bool,

    /// The bias used when the conflict search splits a set of abducibles.
    ///
    /// - "none" splits by alternation
    /// - "longest-conflict" first spreads the longest explanation found so far over both halves
    /// - "median" separates pairs of abducibles which often occur together in explanations
    #[arg(long, value_enum, default_value_t, verbatim_doc_comment)]
    conflict_caching: ConflictCachingHeuristic,

    /// The maximal number of decisions of a single consistency check. A check which needs more
    /// aborts the search with an error.
    ///
    /// Possible values: u64 (Optional)
    #[arg(long = "decision-limit", verbatim_doc_comment)]
    decision_limit: Option<u64>,

    /// The output path for the explanation records: the records written while searching,
    /// followed by the final records.
    #[arg(long = "records", verbatim_doc_comment)]
    records_path: Option<PathBuf>,

    /// Prints the progress of the search.
    ///
    /// Possible values: bool
    #[arg(long = "progress", verbatim_doc_comment)]
    progress: bool,

    /// Enables log message output from the solver.
    ///
    /// Possible values: bool
    #[arg(short = 'v', long = "verbose", verbatim_doc_comment)]
    verbose: bool,

    /// Enables logging of statistics from the solver.
    ///
    /// Possible values: bool
    #[arg(short = 's', long = "log-statistics", verbatim_doc_comment)]
    log_statistics: bool,

    /// If `--verbose` is enabled then this option removes the timestamp information from the log
    /// messages.
    ///
    /// Possible values: bool
    #[arg(long = "omit-timestamp", verbatim_doc_comment)]
    omit_timestamp: bool,

    /// If `--verbose` is enabled then this option removes the call site information from the log
    /// messages. The call site is the file and line from which the message originated.
    ///
    /// Possible values: bool
    #[arg(long = "omit-call-site", default_value_t = false, verbatim_doc_comment)]
    omit_call_site: bool,
}

impl Args {
    fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            strategy: self.strategy,
            depth_limit: self.depth_limit,
            timeout: self.timeout.map(Duration::from_secs),
            negation_allowed: !self.no_negation,
            roles_allowed: self.roles,
            loops_allowed: !self.no_loops,
            strict_relevance: !self.no_strict_relevance,
            model_reuse: !self.no_model_reuse,
            qxp_refinement: self.qxp_refinement,
            conflict_caching: self.conflict_caching,
        }
    }
}

fn configure_logging(
    verbose: bool,
    log_statistics: bool,
    omit_timestamp: bool,
    omit_call_site: bool,
) {
    if log_statistics {
        configure_statistic_logging(
            "%%%abd-stat:",
            Some("%%%abd-stat-end"),
            Some(Case::Camel),
            None,
        );
    }
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "% ")?;
            if record.level() != Level::Info && !omit_timestamp {
                write!(buf, "{} ", buf.timestamp())?;
            }
            write!(buf, "{} ", record.level())?;
            if record.level() != Level::Info && !omit_call_site {
                write!(
                    buf,
                    "[{}:{}] ",
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0)
                )?;
            }
            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> AbductionCliResult<()> {
    let args = Args::parse();

    configure_logging(
        args.verbose,
        args.log_statistics,
        args.omit_timestamp,
        args.omit_call_site,
    );

    if args.instance_path.extension().and_then(|ext| ext.to_str()) != Some("kb") {
        return Err(AbductionCliError::invalid_instance(
            args.instance_path.display(),
        ));
    }

    let mut instance =
        Instance::read(File::open(&args.instance_path)?)?.with_decision_limit(args.decision_limit);

    let mut termination = OsSignal::install()?;
    let mut progress = args.progress.then_some(|percentage: f64, message: &str| {
        println!("% progress {percentage:.2} {message}");
    });

    let result = instance.solve(
        args.solver_options(),
        &mut termination,
        &mut progress,
        &mut (),
    );

    if should_log_statistics() {
        instance
            .oracle
            .statistics()
            .log(StatisticLogger::new("oracle"));
    }

    match result {
        Ok(report) => {
            if report.timed_out {
                warn!("The search was stopped before the tree was exhausted");
            }
            report_results(&report, args.records_path.as_deref())
        }
        Err(solve_error) => {
            report_results(solve_error.partial_report(), args.records_path.as_deref())?;
            Err(solve_error.into())
        }
    }
}

/// Prints the status, the explanations and the records per size, and writes all records to
/// `records_path` if it is given.
fn report_results(report: &AbductionReport, records_path: Option<&Path>) -> AbductionCliResult<()> {
    report.log_statistics();

    let mut writer = RecordWriter::new(std::io::stdout().lock());
    writer.log_message(&report.status)?;
    for explanation in &report.explanations {
        writer.log_message(explanation)?;
    }
    for record in &report.depth_records {
        writer.log_record(record)?;
    }
    writer.flush()?;

    if let Some(path) = records_path {
        let mut writer = RecordWriter::new(File::create(path)?);
        report.write_partial_records(&mut writer)?;
        report.write_records(&mut writer)?;
        info!("Records written to {}", path.display());
    }

    Ok(())
}

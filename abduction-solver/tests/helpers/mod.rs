//! Helpers to run the solver binary in the integration tests.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;
use std::time::Duration;

use regex::Regex;
use wait_timeout::ChildExt;

#[derive(Debug)]
pub(crate) struct SolverRun {
    pub(crate) exit_code: Option<i32>,
    pub(crate) stdout: String,
    pub(crate) records_file: PathBuf,
}

impl SolverRun {
    /// The first line which is not a log message.
    pub(crate) fn status(&self) -> &str {
        self.stdout
            .lines()
            .find(|line| !line.starts_with('%'))
            .unwrap_or_default()
    }

    /// The printed explanations.
    pub(crate) fn explanations(&self) -> BTreeSet<String> {
        self.stdout
            .lines()
            .filter(|line| line.starts_with('{'))
            .map(str::to_owned)
            .collect()
    }

    pub(crate) fn records(&self) -> Vec<ParsedRecord> {
        parse_records(&self.stdout)
    }

    pub(crate) fn records_file_contents(&self) -> String {
        std::fs::read_to_string(&self.records_file).expect("the records file was written")
    }
}

/// The fields of a `depth;count;seconds[-TIMEOUT][-ERROR];{...}` line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ParsedRecord {
    pub(crate) index: usize,
    pub(crate) count: usize,
    pub(crate) timed_out: bool,
    pub(crate) errored: bool,
}

pub(crate) fn parse_records(output: &str) -> Vec<ParsedRecord> {
    let record = Regex::new(r"^(\d+);(\d+);\d+\.\d{2}(-TIMEOUT)?(-ERROR)?;\{.*\}$")
        .expect("valid regex");

    output
        .lines()
        .filter_map(|line| record.captures(line))
        .map(|captures| ParsedRecord {
            index: captures[1].parse().expect("numeric index"),
            count: captures[2].parse().expect("numeric count"),
            timed_out: captures.get(3).is_some(),
            errored: captures.get(4).is_some(),
        })
        .collect()
}

pub(crate) fn instance(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("instances")
        .join(format!("{name}.kb"))
}

/// Runs the solver on `instance_path` with the given arguments. The output files are named after
/// `run_name`, which should be unique per test.
pub(crate) fn run_solver(instance_path: impl AsRef<Path>, run_name: &str, args: &[&str]) -> SolverRun {
    const TEST_TIMEOUT: Duration = Duration::from_secs(60);

    let solver = PathBuf::from(env!("CARGO_BIN_EXE_abduction-solver"));
    let output_directory = PathBuf::from(env!("CARGO_TARGET_TMPDIR"));
    let log_file_path = output_directory.join(format!("{run_name}.log"));
    let records_file_path = output_directory.join(format!("{run_name}.records"));

    let mut command = Command::new(solver);
    for arg in args {
        let _ = command.arg(arg);
    }

    let mut child = command
        .arg(instance_path.as_ref())
        .stdout(File::create(&log_file_path).expect("Failed to create log file."))
        .stderr(Stdio::null())
        .stdin(Stdio::null())
        .spawn()
        .expect("Failed to run solver.");

    let exit_code = match child.wait_timeout(TEST_TIMEOUT) {
        Ok(None) => panic!("solver took more than {} seconds", TEST_TIMEOUT.as_secs()),
        Ok(Some(status)) => status.code(),
        Err(e) => panic!("error starting solver: {e}"),
    };

    let stdout = std::fs::read_to_string(&log_file_path).expect("the log file was written");
    std::fs::remove_file(log_file_path).expect("the log file can be removed");

    SolverRun {
        exit_code,
        stdout,
        records_file: records_file_path,
    }
}

/// The path at which [`run_solver`] expects the records of `run_name`.
pub(crate) fn records_path(run_name: &str) -> String {
    PathBuf::from(env!("CARGO_TARGET_TMPDIR"))
        .join(format!("{run_name}.records"))
        .display()
        .to_string()
}

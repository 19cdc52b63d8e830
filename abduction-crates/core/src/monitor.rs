//! Running the solver on a worker thread while a host application follows its progress.
//!
//! [`spawn_solver`] starts a run and returns a [`MonitorHandle`]. The worker only ever sends
//! [`MonitorMessage`]s over an unbounded channel, so it never waits for the host; the host may
//! stop listening at any time.

use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;

use crate::basic_types::Explanation;
use crate::engine::HybridSolver;
use crate::error::SolveError;
use crate::loader::Loader;
use crate::options::SolverOptions;
use crate::oracle::ConsistencyOracle;
use crate::progress::ExplanationSink;
use crate::progress::ProgressSink;
use crate::results::AbductionReport;
use crate::termination::StopFlag;

/// A notification from a running solver.
#[derive(Debug)]
pub enum MonitorMessage {
    Progress { percentage: f64, message: String },
    /// The explanations accepted since the previous batch. A batch is sent whenever the solver
    /// finishes a depth of the tree, and once more before [`MonitorMessage::Finished`].
    Explanations(Vec<Explanation>),
    /// The outcome of the run; no messages follow.
    Finished(Box<Result<AbductionReport, SolveError>>),
}

/// The host side of a solver running on a worker thread.
#[derive(Debug)]
pub struct MonitorHandle {
    receiver: Receiver<MonitorMessage>,
    stop_flag: StopFlag,
    worker: JoinHandle<()>,
}

impl MonitorHandle {
    pub fn receiver(&self) -> &Receiver<MonitorMessage> {
        &self.receiver
    }

    /// Asks the solver to stop; it then reports the explanations found so far as if the
    /// timeout had expired.
    pub fn cancel(&self) {
        self.stop_flag.raise();
    }

    /// Waits for the worker to finish.
    pub fn join(self) -> std::thread::Result<()> {
        self.worker.join()
    }
}

fn send(sender: &Sender<MonitorMessage>, message: MonitorMessage) {
    // A host which stopped listening is not an error for the solver.
    let _ = sender.send(message);
}

/// Forwards progress updates to the channel.
#[derive(Debug)]
struct ChannelProgress {
    sender: Sender<MonitorMessage>,
}

impl ProgressSink for ChannelProgress {
    fn update_progress(&mut self, percentage: f64, message: &str) {
        send(
            &self.sender,
            MonitorMessage::Progress {
                percentage,
                message: message.to_owned(),
            },
        );
    }
}

/// Collects accepted explanations and forwards them in batches, one per finished depth.
#[derive(Debug)]
struct ChannelSink {
    sender: Sender<MonitorMessage>,
    pending: Vec<Explanation>,
}

impl ChannelSink {
    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let batch = std::mem::take(&mut self.pending);
            send(&self.sender, MonitorMessage::Explanations(batch));
        }
    }
}

impl ExplanationSink for ChannelSink {
    fn explanation_found(&mut self, explanation: &Explanation) {
        self.pending.push(explanation.clone());
    }

    fn level_finished(&mut self) {
        self.flush();
    }
}

/// Runs the solver on a new thread with the given oracle and problem.
pub fn spawn_solver<Oracle, Input>(
    options: SolverOptions,
    mut oracle: Oracle,
    input: Input,
) -> MonitorHandle
where
    Oracle: ConsistencyOracle + Send + 'static,
    Input: Loader + Send + 'static,
{
    let (sender, receiver) = crossbeam_channel::unbounded();
    let stop_flag = StopFlag::new();
    let mut termination = stop_flag.clone();

    let worker = std::thread::spawn(move || {
        let mut progress = ChannelProgress {
            sender: sender.clone(),
        };
        let mut sink = ChannelSink {
            sender,
            pending: Vec::new(),
        };

        let result = HybridSolver::new(options).solve(
            &mut oracle,
            &input,
            &mut termination,
            &mut progress,
            &mut sink,
        );

        sink.flush();
        send(&sink.sender, MonitorMessage::Finished(Box::new(result)));
    });

    MonitorHandle {
        receiver,
        stop_flag,
        worker,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Abducibles;
    use crate::loader::AbductionInput;
    use crate::test_oracle::class;
    use crate::test_oracle::rule;
    use crate::test_oracle::TestOracle;
    use crate::Observation;

    #[test]
    fn messages_end_with_the_report() {
        let observation = Observation::new(vec![class("C", "a")]).expect("non-empty observation");
        let oracle = TestOracle::new(
            vec![rule(&[class("A", "a")], &[class("C", "a")])],
            &observation,
        );
        let input = AbductionInput {
            abducibles: Abducibles::Axioms([class("A", "a")].into_iter().collect()),
            observation,
        };

        let handle = spawn_solver(SolverOptions::default(), oracle, input);
        let messages: Vec<MonitorMessage> = handle.receiver().iter().collect();
        handle.join().expect("the worker does not panic");

        let Some(MonitorMessage::Finished(result)) = messages.last() else {
            panic!("the last message is the report");
        };
        let report = (**result).as_ref().expect("the run succeeds");
        assert_eq!(1, report.explanations.len());

        let streamed: usize = messages
            .iter()
            .map(|message| match message {
                MonitorMessage::Explanations(batch) => batch.len(),
                _ => 0,
            })
            .sum();
        assert_eq!(1, streamed);
        assert!(messages.iter().any(|message| matches!(
            message,
            MonitorMessage::Progress { percentage, .. } if *percentage == 100.0
        )));
    }

    #[test]
    fn explanations_of_one_depth_arrive_together() {
        let observation = Observation::new(vec![class("C", "a")]).expect("non-empty observation");
        let oracle = TestOracle::new(
            vec![
                rule(&[class("A", "a")], &[class("C", "a")]),
                rule(&[class("B", "a"), class("D", "a")], &[class("C", "a")]),
            ],
            &observation,
        );
        let input = AbductionInput {
            abducibles: Abducibles::Axioms(
                [class("A", "a"), class("B", "a"), class("D", "a")]
                    .into_iter()
                    .collect(),
            ),
            observation,
        };

        let handle = spawn_solver(SolverOptions::default(), oracle, input);
        let messages: Vec<MonitorMessage> = handle.receiver().iter().collect();
        handle.join().expect("the worker does not panic");

        // The conflict search at the root finds both explanations before the first depth ends.
        let batches: Vec<usize> = messages
            .iter()
            .filter_map(|message| match message {
                MonitorMessage::Explanations(batch) => Some(batch.len()),
                _ => None,
            })
            .collect();
        assert_eq!(vec![2], batches);
    }
}

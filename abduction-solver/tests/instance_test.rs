#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use std::collections::BTreeSet;
use std::fs::File;
use std::path::PathBuf;

use abduction_solver::core::monitor::spawn_solver;
use abduction_solver::core::monitor::MonitorMessage;
use abduction_solver::core::termination::Indefinite;
use abduction_solver::core::AbductionReport;
use abduction_solver::core::AbductionStatus;
use abduction_solver::core::ConflictCachingHeuristic;
use abduction_solver::core::Explanation;
use abduction_solver::core::SearchStrategy;
use abduction_solver::core::SolverOptions;
use abduction_solver::Instance;

fn instance(name: &str) -> Instance {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("instances")
        .join(format!("{name}.kb"));
    Instance::read(File::open(path).expect("the instance exists")).expect("valid instance")
}

fn family() -> Instance {
    instance("family")
}

fn without_negation() -> SolverOptions {
    SolverOptions {
        negation_allowed: false,
        ..SolverOptions::default()
    }
}

fn rendered(report: &AbductionReport) -> BTreeSet<String> {
    report
        .explanations
        .iter()
        .map(|explanation| explanation.to_string())
        .collect()
}

#[test]
fn every_configuration_finds_the_same_explanations() {
    let expected = rendered(
        &family()
            .solve(without_negation(), &mut Indefinite, &mut (), &mut ())
            .expect("no decision limit"),
    );
    assert_eq!(4, expected.len());

    for strategy in [SearchStrategy::Hybrid, SearchStrategy::PureMhs] {
        for conflict_caching in [
            ConflictCachingHeuristic::None,
            ConflictCachingHeuristic::LongestConflict,
            ConflictCachingHeuristic::Median,
        ] {
            for (qxp_refinement, model_reuse) in [(false, true), (true, false)] {
                let options = SolverOptions {
                    strategy,
                    conflict_caching,
                    qxp_refinement,
                    model_reuse,
                    ..without_negation()
                };

                let report = family()
                    .solve(options, &mut Indefinite, &mut (), &mut ())
                    .expect("no decision limit");

                assert_eq!(AbductionStatus::Completed, report.status);
                assert_eq!(expected, rendered(&report), "{options:?}");
            }
        }
    }
}

#[test]
fn hybrid_search_reports_levels() {
    let report = family()
        .solve(without_negation(), &mut Indefinite, &mut (), &mut ())
        .expect("no decision limit");

    assert!(!report.level_records.is_empty());
    assert_eq!(
        report.explanations.len(),
        report
            .level_records
            .iter()
            .map(|record| record.count())
            .sum::<usize>()
    );
}

#[test]
fn found_explanations_are_streamed() {
    let mut streamed = Vec::new();
    let report = family()
        .solve(
            without_negation(),
            &mut Indefinite,
            &mut (),
            &mut |explanation: &Explanation| {
                streamed.push(explanation.to_string())
            },
        )
        .expect("no decision limit");

    for explanation in rendered(&report) {
        assert!(streamed.contains(&explanation));
    }
}

#[test]
fn monitor_delivers_the_report_last() {
    let Instance { loader, oracle } = family();
    let handle = spawn_solver(without_negation(), oracle, loader);

    let mut explanations = 0;
    let mut report = None;
    for message in handle.receiver().iter() {
        match message {
            MonitorMessage::Progress { .. } => {}
            MonitorMessage::Explanations(batch) => explanations += batch.len(),
            MonitorMessage::Finished(result) => {
                report = Some((*result).expect("no decision limit"));
                break;
            }
        }
    }

    handle.join().expect("the worker does not panic");
    let report = report.expect("the worker finished");
    assert_eq!(4, report.explanations.len());
    assert!(explanations >= 4);
}

#[test]
fn decision_limit_fails_with_partial_report() {
    let error = family()
        .with_decision_limit(Some(0))
        .solve(without_negation(), &mut Indefinite, &mut (), &mut ())
        .expect_err("the oracle needs decisions");

    assert!(matches!(
        error.partial_report().status,
        AbductionStatus::Error(_)
    ));
    assert!(error.partial_report().explanations.is_empty());
}

#[test]
fn strategies_agree_with_negated_abducibles() {
    let expected: BTreeSet<String> = ["{Grandfather(jack)}", "{Parent(jack),¬Female(jack)}"]
        .into_iter()
        .map(str::to_owned)
        .collect();

    for strategy in [SearchStrategy::Hybrid, SearchStrategy::PureMhs] {
        let options = SolverOptions {
            strategy,
            ..SolverOptions::default()
        };
        let report = instance("negation")
            .solve(options, &mut Indefinite, &mut (), &mut ())
            .expect("no decision limit");

        assert_eq!(AbductionStatus::Completed, report.status);
        assert_eq!(expected, rendered(&report), "{strategy:?}");
    }
}

#[test]
fn negated_abducibles_do_not_change_positive_explanations() {
    let solve = |strategy| {
        let options = SolverOptions {
            strategy,
            ..SolverOptions::default()
        };
        rendered(
            &instance("grandparents")
                .solve(options, &mut Indefinite, &mut (), &mut ())
                .expect("no decision limit"),
        )
    };

    let hybrid = solve(SearchStrategy::Hybrid);
    assert_eq!(
        BTreeSet::from(["{Grandfather(jack),Grandmother(jane)}".to_owned()]),
        hybrid
    );
    assert_eq!(hybrid, solve(SearchStrategy::PureMhs));
}

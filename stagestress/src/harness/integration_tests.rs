//! End-to-end tests driving the harness the way callers do.

use super::*;
use crate::errors::{ConfigurationErrorKind, HarnessError};
use crate::stages::FixedOutcome;
use crate::testing::{ConcurrencyProbe, PanickingStage, SlowStage};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn two_stage_harness() -> Harness {
    let mut harness = Harness::new();
    harness.register_stage("first", FixedOutcome(1)).unwrap();
    harness.register_stage("second", FixedOutcome(2)).unwrap();
    harness
}

#[test]
fn test_two_stage_filter_scenario() {
    let mut harness = two_stage_harness();
    harness.run(2, 4).unwrap();

    let report = harness.statistics([1, 2], true).unwrap();
    assert_eq!(report.valid_count, 4);
    assert_eq!(report.stages.len(), 2);
    assert!(report.total.is_some());

    let err = harness.statistics([2, 1], true).unwrap_err();
    assert!(matches!(err, HarnessError::EmptyResult(_)));
}

#[test]
fn test_single_run_single_stage() {
    let mut harness = Harness::new();
    harness.register_stage("only", FixedOutcome(1)).unwrap();
    harness.run(1, 1).unwrap();

    let raw = harness.raw_results();
    assert_eq!(raw.completed_runs(), 1);
    let record = raw.record(0, 0).unwrap();
    assert_eq!(record.flag, 1);

    let report = harness.statistics([1], false).unwrap();
    let stage = &report.stages[0];
    assert_eq!(stage.average, record.duration);
    assert_eq!(stage.p90, record.duration);
    assert_eq!(stage.p95, record.duration);
    assert_eq!(stage.p99, record.duration);
}

#[test]
fn test_all_ones_filter_keeps_every_run() {
    let mut harness = Harness::new();
    harness
        .register_stage("vary", |run: usize| 1_u64 << (run % 8))
        .unwrap();
    harness.register_stage("fixed", FixedOutcome(4)).unwrap();
    harness.run(3, 40).unwrap();

    let report = harness.statistics(FilterMask::accept_all(2), true).unwrap();
    assert_eq!(report.valid_count, 40);
    assert_eq!(report.recorded_runs, 40);
}

#[test]
fn test_partial_filter() {
    let mut harness = Harness::new();
    harness
        .register_stage("parity", |run: usize| if run % 2 == 0 { 1_u64 } else { 2_u64 })
        .unwrap();
    harness.run(4, 20).unwrap();

    assert_eq!(harness.statistics([1], false).unwrap().valid_count, 10);
    assert_eq!(harness.statistics([2], false).unwrap().valid_count, 10);
    assert_eq!(harness.statistics([3], false).unwrap().valid_count, 20);
}

#[test]
fn test_result_shape_after_run() {
    let mut harness = Harness::new();
    for name in ["a", "b", "c"] {
        harness.register_stage(name, FixedOutcome(1)).unwrap();
    }
    harness.run(5, 33).unwrap();

    let map = harness.raw_results().to_map();
    assert_eq!(map.len(), 33);
    assert!(map.values().all(|stages| stages.len() == 3));
}

#[test]
fn test_raw_results_are_stable() {
    let mut harness = two_stage_harness();
    harness.run(2, 10).unwrap();

    let first = harness.raw_results().clone();
    let _ = harness.report([1, 2], true).unwrap();
    let second = harness.raw_results().clone();
    assert_eq!(first, second);
    assert_eq!(first.to_map(), second.to_map());
}

#[test]
fn test_percentiles_monotonic_end_to_end() {
    let mut harness = Harness::new();
    harness
        .register_stage("jitter", |run: usize| {
            std::thread::sleep(Duration::from_micros((run as u64 * 37) % 400));
            1_u64
        })
        .unwrap();
    harness.run(4, 60).unwrap();

    let report = harness.statistics([1], true).unwrap();
    for stats in report.stages.iter().chain(report.total.iter()) {
        assert!(stats.p90 <= stats.p95, "{}", stats.name);
        assert!(stats.p95 <= stats.p99, "{}", stats.name);
    }
}

#[test]
fn test_concurrency_bound_end_to_end() {
    let probe = Arc::new(ConcurrencyProbe::new());
    let mut harness = Harness::new();
    let enter = Arc::clone(&probe);
    harness
        .register_stage("enter", move |_run: usize| {
            enter.enter();
            1_u64
        })
        .unwrap();
    harness
        .register_stage("work", SlowStage::new(Duration::from_millis(1), 1))
        .unwrap();
    let exit = Arc::clone(&probe);
    harness
        .register_stage("exit", move |_run: usize| {
            exit.exit();
            1_u64
        })
        .unwrap();

    let summary = harness.run(4, 40).unwrap();
    assert!(probe.peak() <= 4);
    assert!(summary.peak_in_flight <= 4);
    assert_eq!(probe.entered(), 40);
}

#[test]
fn test_register_after_run_rejected() {
    let mut harness = two_stage_harness();
    harness.run(1, 1).unwrap();

    match harness.register_stage("late", FixedOutcome(1)) {
        Err(HarnessError::Configuration(err)) => {
            assert_eq!(err.kind, ConfigurationErrorKind::RegistryFrozen);
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
    assert_eq!(harness.stages().len(), 2);
}

#[test]
fn test_run_twice_rejected() {
    let mut harness = two_stage_harness();
    harness.run(1, 2).unwrap();

    match harness.run(1, 2) {
        Err(HarnessError::Configuration(err)) => {
            assert_eq!(err.kind, ConfigurationErrorKind::AlreadyRun);
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_invalid_config_leaves_harness_usable() {
    let mut harness = two_stage_harness();
    assert!(matches!(
        harness.run(0, 5),
        Err(HarnessError::Configuration(_))
    ));

    harness.register_stage("third", FixedOutcome(1)).unwrap();
    let summary = harness.run(1, 5).unwrap();
    assert_eq!(summary.completed_runs, 5);
    assert_eq!(harness.raw_results().stage_count(), 3);
}

#[test]
fn test_no_stages_rejected() {
    let mut harness = Harness::new();
    match harness.run(1, 1) {
        Err(HarnessError::Configuration(err)) => {
            assert_eq!(err.kind, ConfigurationErrorKind::NoStages);
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_report_before_run_is_empty() {
    let harness = two_stage_harness();
    assert!(matches!(
        harness.statistics([1, 2], false),
        Err(HarnessError::EmptyResult(_))
    ));
}

#[test]
fn test_report_returns_rendered_statistics() {
    let mut harness = two_stage_harness();
    harness.run(2, 4).unwrap();

    let report = harness.report([1, 2], true).unwrap();
    let text = report.to_string();
    assert!(text.starts_with("stage - first\n-----\naverage: "));
    assert!(text.contains("stage - second\n"));
    assert!(text.contains("total\n-----\n"));
    assert!(text.ends_with("4 valid result\n"));
}

#[test]
fn test_fail_fast_keeps_completed_runs() {
    let mut harness = Harness::new();
    harness
        .register_stage("boom", PanickingStage::on_runs([5], 1))
        .unwrap();

    let err = harness.run(1, 10).unwrap_err();
    assert!(matches!(err, HarnessError::CallbackFailure(ref f) if f.run == 5));
    assert!(harness.summary().is_none());

    // Runs 0..5 finished before the failure.
    assert_eq!(harness.raw_results().completed_runs(), 5);
    let report = harness.statistics([1], false).unwrap();
    assert_eq!(report.valid_count, 5);
}

#[test]
fn test_isolate_run_reports_survivors() {
    let mut harness = Harness::new().with_failure_mode(FailureMode::IsolateRun);
    harness
        .register_stage("flaky", PanickingStage::on_runs([0, 9], 1))
        .unwrap();

    let summary = harness.run(3, 12).unwrap();
    assert_eq!(summary.failed_runs(), 2);
    assert_eq!(summary.completed_runs, 10);
    assert_eq!(harness.summary().unwrap().failed_runs(), 2);

    let report = harness.statistics([1], false).unwrap();
    assert_eq!(report.valid_count, 10);
}

#[test]
fn test_summary_metadata() {
    let mut harness = two_stage_harness();
    let summary = harness.run(3, 9).unwrap();

    assert_eq!(summary.harness_id, harness.id());
    assert_eq!(summary.concurrency, 3);
    assert_eq!(summary.total, 9);
    assert!(summary.finished_at >= summary.started_at);
    assert!(summary.is_success());
}

#[test]
fn test_independent_harnesses() {
    let handles: Vec<_> = (0..4_u64)
        .map(|i| {
            std::thread::spawn(move || {
                let mut harness = Harness::new();
                harness.register_stage("id", FixedOutcome(1 << i)).unwrap();
                harness.run(2, 25).unwrap();
                harness.statistics([1 << i], false).unwrap().valid_count
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 25);
    }
}

#[test]
fn test_config_from_json_drives_run() {
    let config = HarnessConfig::from_json(r#"{"concurrency": 2, "total": 6}"#).unwrap();
    let mut harness = two_stage_harness();
    let summary = harness.run_with_config(config).unwrap();
    assert_eq!(summary.completed_runs, 6);
}

//! Fixed-concurrency run scheduler.
//!
//! The scheduler launches `min(concurrency, total)` worker threads, each
//! seeded with one of the first run indices. When a worker finishes a run it
//! claims the next unstarted index from a shared counter and keeps going, so
//! the number of runs in flight never exceeds the configured concurrency.

mod worker;

pub use worker::WorkerState;

use crate::config::{FailureMode, HarnessConfig};
use crate::errors::{CallbackFailure, Result};
use crate::results::ResultStore;
use crate::stages::Stage;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use uuid::Uuid;
use worker::Worker;

/// Outcome of a completed [`Scheduler::run`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Identifier of the harness that produced the run.
    pub harness_id: Uuid,
    /// Requested concurrency.
    pub concurrency: usize,
    /// Requested number of runs.
    pub total: usize,
    /// Worker threads actually launched.
    pub workers: usize,
    /// Runs that executed every stage and were recorded.
    pub completed_runs: usize,
    /// Highest number of runs observed executing at once.
    pub peak_in_flight: usize,
    /// Stage callbacks that panicked.
    #[serde(default)]
    pub failures: Vec<CallbackFailure>,
    /// Wall-clock start.
    pub started_at: DateTime<Utc>,
    /// Wall-clock end.
    pub finished_at: DateTime<Utc>,
    /// Monotonic elapsed time.
    pub elapsed: Duration,
}

impl RunSummary {
    /// Returns true if every requested run was recorded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.completed_runs == self.total
    }

    /// Number of runs dropped because a stage panicked.
    #[must_use]
    pub fn failed_runs(&self) -> usize {
        self.failures.len()
    }
}

/// State shared by all workers of one scheduler run.
#[derive(Debug, Default)]
pub(crate) struct SharedState {
    /// Next unclaimed run index.
    next_run: Mutex<usize>,
    /// Set once workers must stop claiming new runs.
    abort: AtomicBool,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    completed: AtomicUsize,
    failures: Mutex<Vec<CallbackFailure>>,
}

impl SharedState {
    /// Claims the next run index, or `None` when the pool should drain.
    pub(crate) fn claim(&self, total: usize) -> Option<usize> {
        let mut next = self.next_run.lock();
        if self.abort.load(Ordering::SeqCst) || *next >= total {
            return None;
        }
        let run = *next;
        *next += 1;
        Some(run)
    }

    pub(crate) fn enter_run(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    pub(crate) fn exit_run(&self, completed: bool) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if completed {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub(crate) fn record_failure(&self, failure: CallbackFailure, mode: FailureMode) {
        if mode == FailureMode::FailFast {
            self.abort.store(true, Ordering::SeqCst);
        }
        self.failures.lock().push(failure);
    }
}

/// Drives the stage sequence of every run across a fixed worker pool.
#[derive(Debug)]
pub struct Scheduler<'a> {
    harness_id: Uuid,
    stages: &'a [Stage],
    config: HarnessConfig,
}

impl<'a> Scheduler<'a> {
    /// Creates a scheduler over `stages`.
    #[must_use]
    pub fn new(harness_id: Uuid, stages: &'a [Stage], config: HarnessConfig) -> Self {
        Self {
            harness_id,
            stages,
            config,
        }
    }

    /// Executes all runs, recording into `store`, and blocks until every
    /// worker has terminated.
    ///
    /// `store` must have been allocated for `config.total` runs and the
    /// scheduler's stage count.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the config is invalid, an IO error if
    /// a worker thread could not be spawned, and, in
    /// [`FailureMode::FailFast`], the first [`CallbackFailure`].
    pub fn run(&self, store: &ResultStore) -> Result<RunSummary> {
        self.config.validate()?;

        let total = self.config.total;
        let workers = self.config.worker_count();
        let span = tracing::info_span!(
            "stress_run",
            harness_id = %self.harness_id,
            concurrency = self.config.concurrency,
            total,
            stages = self.stages.len(),
        );
        let _entered = span.enter();

        let started_at = Utc::now();
        let clock = Instant::now();
        let shared = SharedState::default();

        tracing::info!(workers, failure_mode = %self.config.failure_mode, "Starting stress run");

        let launched = std::thread::scope(|scope| -> std::io::Result<()> {
            // Held until every seed index is handed out, so a fast worker
            // cannot claim an index that is still being assigned.
            let mut next_run = shared.next_run.lock();
            for worker_id in 0..workers {
                let worker = Worker::new(
                    worker_id,
                    self.stages,
                    store,
                    &shared,
                    total,
                    self.config.failure_mode,
                    span.clone(),
                );
                let spawned = std::thread::Builder::new()
                    .name(format!("stagestress-worker-{worker_id}"))
                    .spawn_scoped(scope, move || worker.run(worker_id));
                if let Err(err) = spawned {
                    tracing::error!(worker_id, error = %err, "Failed to spawn worker");
                    *next_run = worker_id;
                    shared.abort.store(true, Ordering::SeqCst);
                    return Err(err);
                }
            }
            *next_run = workers;
            Ok(())
        });

        let elapsed = clock.elapsed();
        launched?;

        let failures = std::mem::take(&mut *shared.failures.lock());
        let summary = RunSummary {
            harness_id: self.harness_id,
            concurrency: self.config.concurrency,
            total,
            workers,
            completed_runs: shared.completed.load(Ordering::SeqCst),
            peak_in_flight: shared.peak_in_flight.load(Ordering::SeqCst),
            failures,
            started_at,
            finished_at: Utc::now(),
            elapsed,
        };

        if self.config.failure_mode == FailureMode::FailFast {
            if let Some(first) = summary.failures.first() {
                tracing::error!(
                    completed = summary.completed_runs,
                    error = %first,
                    "Stress run aborted"
                );
                return Err(first.clone().into());
            }
        }

        tracing::info!(
            completed = summary.completed_runs,
            failed = summary.failed_runs(),
            peak_in_flight = summary.peak_in_flight,
            elapsed = ?summary.elapsed,
            "Stress run finished"
        );
        Ok(summary)
    }
}

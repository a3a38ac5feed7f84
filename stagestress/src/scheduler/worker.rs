//! Worker loop executing runs until the pool drains.

use super::SharedState;
use crate::config::FailureMode;
use crate::core::StageRecord;
use crate::errors::{panic_message, CallbackFailure};
use crate::results::ResultStore;
use crate::stages::Stage;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

/// Lifecycle of a worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Not yet launched.
    Idle,
    /// Holds a run index but has not started its first stage.
    Assigned(usize),
    /// Executing a stage of the assigned run.
    Executing {
        /// Run index.
        run: usize,
        /// Stage index.
        stage: usize,
    },
    /// Finished every stage of a run.
    Completed(usize),
    /// No run left to claim.
    Terminated,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Assigned(run) => write!(f, "assigned({run})"),
            Self::Executing { run, stage } => write!(f, "executing({run}, {stage})"),
            Self::Completed(run) => write!(f, "completed({run})"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}

pub(super) struct Worker<'a> {
    id: usize,
    stages: &'a [Stage],
    store: &'a ResultStore,
    shared: &'a SharedState,
    total: usize,
    failure_mode: FailureMode,
    span: tracing::Span,
    state: WorkerState,
}

impl<'a> Worker<'a> {
    pub(super) fn new(
        id: usize,
        stages: &'a [Stage],
        store: &'a ResultStore,
        shared: &'a SharedState,
        total: usize,
        failure_mode: FailureMode,
        span: tracing::Span,
    ) -> Self {
        Self {
            id,
            stages,
            store,
            shared,
            total,
            failure_mode,
            span,
            state: WorkerState::Idle,
        }
    }

    /// Runs `first`, then keeps claiming run indices until none remain.
    pub(super) fn run(mut self, first: usize) {
        let span = self.span.clone();
        let _entered = span.enter();
        tracing::debug!(worker = self.id, first, "Worker started");

        let mut executed = 0_usize;
        let mut current = Some(first);
        while let Some(run) = current {
            self.transition(WorkerState::Assigned(run));
            self.shared.enter_run();
            let completed = match self.execute(run) {
                Ok(records) => self.store.publish(run, records),
                Err(failure) => {
                    tracing::warn!(worker = self.id, error = %failure, "Stage callback failed");
                    self.shared.record_failure(failure, self.failure_mode);
                    false
                }
            };
            self.shared.exit_run(completed);
            self.transition(WorkerState::Completed(run));
            executed += 1;

            current = self.shared.claim(self.total);
            if let Some(next) = current {
                tracing::trace!(worker = self.id, run = next, "Claimed run");
            }
        }

        self.transition(WorkerState::Terminated);
        tracing::debug!(worker = self.id, executed, "Worker terminated");
    }

    /// Executes every stage of `run` in order.
    fn execute(&mut self, run: usize) -> Result<Vec<StageRecord>, CallbackFailure> {
        let mut records = Vec::with_capacity(self.stages.len());
        for stage in self.stages {
            self.transition(WorkerState::Executing {
                run,
                stage: stage.index(),
            });
            let start = Instant::now();
            let flag = catch_unwind(AssertUnwindSafe(|| stage.execute(run))).map_err(|payload| {
                CallbackFailure::new(run, stage.index(), stage.name(), panic_message(&*payload))
            })?;
            records.push(StageRecord::new(start.elapsed(), flag));
        }
        Ok(records)
    }

    fn transition(&mut self, next: WorkerState) {
        tracing::trace!(worker = self.id, from = %self.state, to = %next, "Worker state");
        self.state = next;
    }
}

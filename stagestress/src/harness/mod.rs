//! The public harness façade.
//!
//! A [`Harness`] owns its stage registry, its result store and all
//! scheduling state, so independent harnesses never interfere with each
//! other.

#[cfg(test)]
mod integration_tests;

use crate::config::{FailureMode, HarnessConfig};
use crate::core::FilterMask;
use crate::errors::{ConfigurationError, Result};
use crate::results::ResultStore;
use crate::scheduler::{RunSummary, Scheduler};
use crate::stages::{StageRegistry, StageWork};
use crate::stats::{Report, StatsReporter};
use uuid::Uuid;

/// Stress harness: register stages, run them, report on the results.
///
/// ```
/// use stagestress::prelude::*;
///
/// let mut harness = Harness::new();
/// harness.register_stage("connect", |_run: usize| 1_u64)?;
/// harness.register_stage("query", |_run: usize| 2_u64)?;
///
/// let summary = harness.run(2, 4)?;
/// assert_eq!(summary.completed_runs, 4);
///
/// let report = harness.statistics([1, 2], true)?;
/// assert_eq!(report.valid_count, 4);
/// # Ok::<(), stagestress::errors::HarnessError>(())
/// ```
#[derive(Debug)]
pub struct Harness {
    id: Uuid,
    registry: StageRegistry,
    failure_mode: FailureMode,
    results: ResultStore,
    summary: Option<RunSummary>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Creates a harness with no stages.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            registry: StageRegistry::new(),
            failure_mode: FailureMode::default(),
            results: ResultStore::default(),
            summary: None,
        }
    }

    /// Sets how stage panics are handled by [`run`](Self::run).
    #[must_use]
    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Unique identifier of this harness, attached to its log spans.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Appends a stage and returns its index.
    ///
    /// `work` is called concurrently for different runs and must be safe to
    /// share across threads. Stages must all be registered before
    /// [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Returns a configuration error once the harness has started running.
    pub fn register_stage<W>(&mut self, name: impl Into<String>, work: W) -> Result<usize>
    where
        W: StageWork + 'static,
    {
        Ok(self.registry.register(name, work)?)
    }

    /// Executes `total` runs keeping `concurrency` in flight. Blocks until
    /// every run has finished.
    pub fn run(&mut self, concurrency: usize, total: usize) -> Result<RunSummary> {
        let config = HarnessConfig::new(concurrency, total).with_failure_mode(self.failure_mode);
        self.run_with_config(config)
    }

    /// Executes the runs described by `config`.
    ///
    /// # Errors
    ///
    /// Configuration problems are reported before any worker starts. With
    /// [`FailureMode::FailFast`] the first panicking stage is returned as a
    /// [`CallbackFailure`](crate::errors::CallbackFailure); runs that
    /// finished stay available through [`raw_results`](Self::raw_results).
    pub fn run_with_config(&mut self, config: HarnessConfig) -> Result<RunSummary> {
        if self.registry.is_frozen() {
            return Err(ConfigurationError::already_run().into());
        }
        config.validate()?;
        if self.registry.is_empty() {
            return Err(ConfigurationError::no_stages().into());
        }

        self.registry.freeze();
        self.results = ResultStore::new(config.total, self.registry.len());

        let scheduler = Scheduler::new(self.id, self.registry.as_slice(), config);
        let summary = scheduler.run(&self.results)?;
        self.summary = Some(summary.clone());
        Ok(summary)
    }

    /// Computes statistics without printing them.
    ///
    /// # Errors
    ///
    /// Returns an empty-result error when no recorded run passes `filter`.
    pub fn statistics(&self, filter: impl Into<FilterMask>, include_total: bool) -> Result<Report> {
        let names = self.registry.names();
        let reporter = StatsReporter::new(&self.results, &names);
        Ok(reporter.compute(&filter.into(), include_total)?)
    }

    /// Computes statistics and prints the text report to standard output.
    ///
    /// # Errors
    ///
    /// Returns an empty-result error when no recorded run passes `filter`.
    pub fn report(&self, filter: impl Into<FilterMask>, include_total: bool) -> Result<Report> {
        let report = self.statistics(filter, include_total)?;
        print!("{report}");
        Ok(report)
    }

    /// The raw measurement table.
    #[must_use]
    pub fn raw_results(&self) -> &ResultStore {
        &self.results
    }

    /// Summary of the last successful run.
    #[must_use]
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// The registered stages.
    #[must_use]
    pub fn stages(&self) -> &StageRegistry {
        &self.registry
    }
}

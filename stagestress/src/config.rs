//! Harness configuration.

use crate::errors::{ConfigurationError, Result};
use serde::{Deserialize, Serialize};

/// How the scheduler reacts to a panicking stage callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Stop claiming new runs on the first failure and fail the whole run
    /// (default). Runs already executing finish before `run` returns.
    #[default]
    FailFast,
    /// Drop the failed run, record the failure, keep going.
    IsolateRun,
}

impl std::fmt::Display for FailureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FailFast => write!(f, "fail_fast"),
            Self::IsolateRun => write!(f, "isolate_run"),
        }
    }
}

/// Parameters of a stress run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Number of runs kept in flight.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Number of runs to execute in total.
    #[serde(default)]
    pub total: usize,
    /// Panic handling policy.
    #[serde(default)]
    pub failure_mode: FailureMode,
}

fn default_concurrency() -> usize {
    1
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            total: 0,
            failure_mode: FailureMode::default(),
        }
    }
}

impl HarnessConfig {
    /// Creates a configuration for `total` runs at `concurrency`.
    #[must_use]
    pub fn new(concurrency: usize, total: usize) -> Self {
        Self {
            concurrency,
            total,
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the concurrency.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the total run count.
    #[must_use]
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = total;
        self
    }

    /// Sets the failure mode.
    #[must_use]
    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Number of workers actually launched.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.concurrency.min(self.total)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `concurrency` is zero. A `total` below
    /// `concurrency` is accepted; only `total` workers are launched.
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        if self.concurrency == 0 {
            return Err(ConfigurationError::invalid_concurrency(self.concurrency));
        }
        Ok(())
    }
}

//! Error types for the stress harness.
//!
//! Three failure classes surface to callers: configuration problems caught
//! before any worker launches, reports over an empty result set, and stage
//! callbacks that panicked while a run was executing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Convenience result alias used across the crate.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// The main error type for harness operations.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The harness was configured or driven incorrectly.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// A report was requested but no run survived the filter.
    #[error("{0}")]
    EmptyResult(#[from] EmptyResultError),

    /// A stage callback panicked.
    #[error("{0}")]
    CallbackFailure(#[from] CallbackFailure),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for HarnessError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// What kind of misconfiguration was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigurationErrorKind {
    /// `concurrency` was zero.
    InvalidConcurrency,
    /// A stage was registered after scheduling began.
    RegistryFrozen,
    /// `run` was called with no stages registered.
    NoStages,
    /// `run` was called on a harness that already ran.
    AlreadyRun,
}

impl std::fmt::Display for ConfigurationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConcurrency => write!(f, "invalid_concurrency"),
            Self::RegistryFrozen => write!(f, "registry_frozen"),
            Self::NoStages => write!(f, "no_stages"),
            Self::AlreadyRun => write!(f, "already_run"),
        }
    }
}

/// Error raised when the harness is misconfigured.
#[derive(Debug, Clone, Error)]
#[error("Configuration error ({kind}): {message}")]
pub struct ConfigurationError {
    /// The kind of misconfiguration.
    pub kind: ConfigurationErrorKind,
    /// Human readable description.
    pub message: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
}

impl ConfigurationError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn new(kind: ConfigurationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fix_hint: None,
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Concurrency below one.
    #[must_use]
    pub fn invalid_concurrency(concurrency: usize) -> Self {
        Self::new(
            ConfigurationErrorKind::InvalidConcurrency,
            format!("concurrency must be at least 1, got {concurrency}"),
        )
        .with_fix_hint("Pass a concurrency of 1 or more.")
    }

    /// Registration attempted once the registry is frozen.
    #[must_use]
    pub fn registry_frozen(stage: &str) -> Self {
        Self::new(
            ConfigurationErrorKind::RegistryFrozen,
            format!("cannot register stage '{stage}' after scheduling has begun"),
        )
        .with_fix_hint("Register every stage before calling run.")
    }

    /// Nothing to execute.
    #[must_use]
    pub fn no_stages() -> Self {
        Self::new(ConfigurationErrorKind::NoStages, "no stages registered")
            .with_fix_hint("Register at least one stage before calling run.")
    }

    /// A harness runs once.
    #[must_use]
    pub fn already_run() -> Self {
        Self::new(
            ConfigurationErrorKind::AlreadyRun,
            "harness has already been run",
        )
        .with_fix_hint("Create a new harness for each stress run.")
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("ConfigurationError"));
        map.insert("kind".to_string(), serde_json::json!(self.kind));
        map.insert("message".to_string(), serde_json::json!(self.message));
        if let Some(ref hint) = self.fix_hint {
            map.insert("fix_hint".to_string(), serde_json::json!(hint));
        }
        map
    }
}

/// Error raised when a report has no valid runs to aggregate.
#[derive(Debug, Clone, Error)]
#[error("No valid results: {recorded_runs} recorded run(s), none matched filter {filter:?}")]
pub struct EmptyResultError {
    /// Number of runs present in the result store.
    pub recorded_runs: usize,
    /// The filter mask that was applied.
    pub filter: Vec<u64>,
}

impl EmptyResultError {
    /// Creates a new empty result error.
    #[must_use]
    pub fn new(recorded_runs: usize, filter: Vec<u64>) -> Self {
        Self {
            recorded_runs,
            filter,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("EmptyResultError"));
        map.insert("recorded_runs".to_string(), serde_json::json!(self.recorded_runs));
        map.insert("filter".to_string(), serde_json::json!(self.filter));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Error raised when a stage callback panics.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("Stage '{stage_name}' (index {stage}) failed on run {run}: {message}")]
pub struct CallbackFailure {
    /// Run index that was executing.
    pub run: usize,
    /// Stage index that panicked.
    pub stage: usize,
    /// Stage display name.
    pub stage_name: String,
    /// Panic payload rendered as text.
    pub message: String,
}

impl CallbackFailure {
    /// Creates a new callback failure.
    #[must_use]
    pub fn new(
        run: usize,
        stage: usize,
        stage_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            run,
            stage,
            stage_name: stage_name.into(),
            message: message.into(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("CallbackFailure"));
        map.insert("run".to_string(), serde_json::json!(self.run));
        map.insert("stage".to_string(), serde_json::json!(self.stage));
        map.insert("stage_name".to_string(), serde_json::json!(self.stage_name));
        map.insert("message".to_string(), serde_json::json!(self.message));
        map
    }
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

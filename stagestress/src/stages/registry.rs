//! Ordered, append-only stage registry.

use super::{Stage, StageWork};
use crate::errors::ConfigurationError;
use std::sync::Arc;

/// Ordered list of stages executed by every run.
///
/// Stages are appended with contiguous indices starting at zero. Once the
/// scheduler starts the registry is frozen and further registration fails.
#[derive(Debug, Default, Clone)]
pub struct StageRegistry {
    stages: Vec<Stage>,
    frozen: bool,
}

impl StageRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage and returns its index.
    ///
    /// Names are not required to be unique.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the registry has been frozen.
    pub fn register<W>(&mut self, name: impl Into<String>, work: W) -> Result<usize, ConfigurationError>
    where
        W: StageWork + 'static,
    {
        let name = name.into();
        if self.frozen {
            return Err(ConfigurationError::registry_frozen(&name));
        }
        let index = self.stages.len();
        tracing::debug!(stage = %name, index, "Registered stage");
        self.stages.push(Stage::new(index, name, Arc::new(work)));
        Ok(index)
    }

    /// Freezes the registry. Idempotent.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Returns true once the registry no longer accepts stages.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Returns the stage at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Iterates stages in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }

    /// Stages as a slice, indexed by stage index.
    #[must_use]
    pub fn as_slice(&self) -> &[Stage] {
        &self.stages
    }

    /// Stage names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.name.clone()).collect()
    }

    /// Number of registered stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if no stage has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

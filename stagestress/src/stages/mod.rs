//! Stage trait and registry.
//!
//! Stages are the units of work every run executes, in registration order.

mod registry;

pub use registry::StageRegistry;

use crate::core::OutcomeFlag;
use std::fmt::Debug;
use std::sync::Arc;

/// Work performed by a stage for one run.
///
/// Many runs can sit in the same stage at once, so implementations are
/// invoked concurrently from several worker threads and must synchronize
/// any shared state themselves.
pub trait StageWork: Send + Sync {
    /// Executes the stage for `run_index` and returns its outcome flag.
    fn execute(&self, run_index: usize) -> OutcomeFlag;
}

impl<F> StageWork for F
where
    F: Fn(usize) -> OutcomeFlag + Send + Sync,
{
    fn execute(&self, run_index: usize) -> OutcomeFlag {
        self(run_index)
    }
}

/// A stage that does nothing and always reports the same flag.
#[derive(Debug, Clone, Copy)]
pub struct FixedOutcome(pub OutcomeFlag);

impl StageWork for FixedOutcome {
    fn execute(&self, _run_index: usize) -> OutcomeFlag {
        self.0
    }
}

/// A registered stage.
#[derive(Clone)]
pub struct Stage {
    index: usize,
    name: String,
    work: Arc<dyn StageWork>,
}

impl Stage {
    pub(crate) fn new(index: usize, name: String, work: Arc<dyn StageWork>) -> Self {
        Self { index, name, work }
    }

    /// Position of the stage in the run sequence.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the stage callback.
    pub fn execute(&self, run_index: usize) -> OutcomeFlag {
        self.work.execute(run_index)
    }
}

impl Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("index", &self.index)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

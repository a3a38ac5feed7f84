//! Measurement record for a single (run, stage) pair.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::OutcomeFlag;

/// Elapsed wall-clock time and returned flag of one stage invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageRecord {
    /// Time spent inside the stage callback.
    pub duration: Duration,
    /// Flag returned by the stage callback.
    pub flag: OutcomeFlag,
}

impl StageRecord {
    /// Creates a new record.
    #[must_use]
    pub const fn new(duration: Duration, flag: OutcomeFlag) -> Self {
        Self { duration, flag }
    }

    /// Duration in whole nanoseconds.
    #[must_use]
    pub fn nanos(&self) -> u128 {
        self.duration.as_nanos()
    }
}

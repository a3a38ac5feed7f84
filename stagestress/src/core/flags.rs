//! Outcome flags and filter masks.

use serde::{Deserialize, Serialize};

use super::StageRecord;

/// Caller-defined outcome of a single stage invocation.
///
/// The harness treats the value as an opaque bitmask; which bits mean what
/// is entirely up to the stage implementations and the filters applied when
/// reporting.
pub type OutcomeFlag = u64;

/// Per-stage bitmasks used to select runs for reporting.
///
/// A run is valid when, for every stage index `i`, the flag recorded for
/// that stage shares at least one bit with `mask[i]`. A zero entry, or a
/// missing entry for a stage, rejects every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterMask(Vec<OutcomeFlag>);

impl FilterMask {
    /// Creates a mask from one bitmask per stage.
    #[must_use]
    pub fn new(masks: impl Into<Vec<OutcomeFlag>>) -> Self {
        Self(masks.into())
    }

    /// A mask that accepts any non-zero flag on every stage.
    #[must_use]
    pub fn accept_all(stage_count: usize) -> Self {
        Self(vec![OutcomeFlag::MAX; stage_count])
    }

    /// Returns the mask for a stage, or zero when absent.
    #[must_use]
    pub fn get(&self, stage: usize) -> OutcomeFlag {
        self.0.get(stage).copied().unwrap_or(0)
    }

    /// Returns true if a single stage flag passes this mask.
    #[must_use]
    pub fn matches(&self, stage: usize, flag: OutcomeFlag) -> bool {
        self.get(stage) & flag != 0
    }

    /// Returns true if every stage record of a run passes this mask.
    ///
    /// `records` is indexed by stage.
    #[must_use]
    pub fn accepts(&self, records: &[StageRecord]) -> bool {
        records
            .iter()
            .enumerate()
            .all(|(stage, record)| self.matches(stage, record.flag))
    }

    /// Returns the raw per-stage masks.
    #[must_use]
    pub fn as_slice(&self) -> &[OutcomeFlag] {
        &self.0
    }

    /// Number of stage entries in the mask.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the mask has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<OutcomeFlag>> for FilterMask {
    fn from(masks: Vec<OutcomeFlag>) -> Self {
        Self(masks)
    }
}

impl From<&[OutcomeFlag]> for FilterMask {
    fn from(masks: &[OutcomeFlag]) -> Self {
        Self(masks.to_vec())
    }
}

impl<const N: usize> From<[OutcomeFlag; N]> for FilterMask {
    fn from(masks: [OutcomeFlag; N]) -> Self {
        Self(masks.to_vec())
    }
}

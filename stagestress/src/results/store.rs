//! Pre-sized, write-once result table.

use crate::core::StageRecord;
use crate::errors::Result;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

/// Nested mapping run index → stage index → record.
pub type RawResults = BTreeMap<usize, BTreeMap<usize, StageRecord>>;

/// Table of per (run, stage) measurements.
///
/// Slots are allocated up front for every run index, and each slot is set
/// at most once. Concurrent writers always target distinct slots, so no lock
/// is held while recording.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultStore {
    stage_count: usize,
    runs: Vec<OnceLock<Box<[StageRecord]>>>,
}

impl ResultStore {
    /// Allocates an empty slot for each of `total` runs.
    #[must_use]
    pub fn new(total: usize, stage_count: usize) -> Self {
        Self {
            stage_count,
            runs: (0..total).map(|_| OnceLock::new()).collect(),
        }
    }

    /// Publishes the full record sequence of a finished run.
    ///
    /// Returns false if the index is out of range, the slot was already
    /// filled, or the record count does not match the stage count.
    pub(crate) fn publish(&self, run: usize, records: Vec<StageRecord>) -> bool {
        if records.len() != self.stage_count {
            return false;
        }
        self.runs
            .get(run)
            .is_some_and(|slot| slot.set(records.into_boxed_slice()).is_ok())
    }

    /// Records of a finished run, indexed by stage.
    #[must_use]
    pub fn get(&self, run: usize) -> Option<&[StageRecord]> {
        self.runs.get(run).and_then(OnceLock::get).map(|records| &**records)
    }

    /// A single (run, stage) record.
    #[must_use]
    pub fn record(&self, run: usize, stage: usize) -> Option<StageRecord> {
        self.get(run).and_then(|records| records.get(stage)).copied()
    }

    /// Iterates finished runs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[StageRecord])> {
        self.runs
            .iter()
            .enumerate()
            .filter_map(|(run, slot)| slot.get().map(|records| (run, &**records)))
    }

    /// Number of run slots allocated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Returns true if no run slots were allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Number of stages recorded per run.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stage_count
    }

    /// Number of runs whose records have been published.
    #[must_use]
    pub fn completed_runs(&self) -> usize {
        self.runs.iter().filter(|slot| slot.get().is_some()).count()
    }

    /// Returns true once every allocated run has been published.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_runs() == self.runs.len()
    }

    /// Copies the finished runs into an ordered nested map.
    #[must_use]
    pub fn to_map(&self) -> RawResults {
        self.iter()
            .map(|(run, records)| (run, records.iter().copied().enumerate().collect()))
            .collect()
    }

    /// Serializes the finished runs as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_map())?)
    }

    /// Writes the JSON export to `path`.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

//! Filtering and aggregation over a [`ResultStore`].

use super::{summarize, PercentileRanks, Report};
use crate::core::{FilterMask, StageRecord};
use crate::errors::EmptyResultError;
use crate::results::ResultStore;
use std::time::Duration;

/// Computes per-stage and total latency statistics.
///
/// The reporter only reads the store. Filtering works on a private list of
/// references to the surviving runs.
#[derive(Debug, Clone, Copy)]
pub struct StatsReporter<'a> {
    store: &'a ResultStore,
    stage_names: &'a [String],
}

impl<'a> StatsReporter<'a> {
    /// Creates a reporter over `store`, naming stages with `stage_names`.
    #[must_use]
    pub fn new(store: &'a ResultStore, stage_names: &'a [String]) -> Self {
        Self { store, stage_names }
    }

    /// Runs that pass `filter`, in run index order.
    #[must_use]
    pub fn valid_runs(&self, filter: &FilterMask) -> Vec<(usize, &'a [StageRecord])> {
        self.store
            .iter()
            .filter(|(_, records)| filter.accepts(records))
            .collect()
    }

    /// Filters and aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyResultError`] if no run passes `filter`.
    pub fn compute(&self, filter: &FilterMask, include_total: bool) -> Result<Report, EmptyResultError> {
        let recorded_runs = self.store.completed_runs();
        let valid = self.valid_runs(filter);
        let valid_count = valid.len();
        tracing::debug!(
            recorded_runs,
            valid_count,
            filter = ?filter.as_slice(),
            "Filtered runs for report"
        );

        let ranks = PercentileRanks::for_count(valid_count)
            .ok_or_else(|| EmptyResultError::new(recorded_runs, filter.as_slice().to_vec()))?;

        let stages = (0..self.store.stage_count())
            .map(|stage| {
                let mut samples: Vec<Duration> = valid
                    .iter()
                    .map(|(_, records)| records[stage].duration)
                    .collect();
                samples.sort_unstable();
                summarize(self.stage_name(stage), &samples, ranks)
            })
            .collect();

        let total = include_total.then(|| {
            let mut totals: Vec<Duration> = valid
                .iter()
                .map(|(_, records)| records.iter().map(|r| r.duration).sum())
                .collect();
            totals.sort_unstable();
            summarize("total", &totals, ranks)
        });

        Ok(Report {
            stages,
            total,
            valid_count,
            recorded_runs,
        })
    }

    fn stage_name(&self, stage: usize) -> String {
        self.stage_names
            .get(stage)
            .cloned()
            .unwrap_or_else(|| format!("stage-{stage}"))
    }
}

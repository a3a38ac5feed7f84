//! Latency statistics over recorded runs.
//!
//! Runs are first filtered with a [`FilterMask`](crate::core::FilterMask);
//! the survivors' durations are sorted per stage (and, optionally, summed
//! per run into a total) and summarised by their truncated mean and
//! nearest-below 90th/95th/99th percentile ranks.

mod percentiles;
mod report;
mod reporter;

pub use percentiles::{summarize, PercentileRanks};
pub use report::{Report, StageStats};
pub use reporter::StatsReporter;

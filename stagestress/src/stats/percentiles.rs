//! Rank-based percentile estimation.
//!
//! Percentiles here are plain indices into a sorted sample array,
//! `floor(n * p / 100)`, not interpolated values.

use super::StageStats;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Indices of the 90th/95th/99th percentile in a sorted array of `count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentileRanks {
    /// Number of samples.
    pub count: usize,
    /// Index of the 90th percentile.
    pub p90: usize,
    /// Index of the 95th percentile.
    pub p95: usize,
    /// Index of the 99th percentile.
    pub p99: usize,
}

impl PercentileRanks {
    /// Computes the ranks for `count` samples, or `None` when empty.
    ///
    /// Every rank is clamped to `count - 1`.
    #[must_use]
    pub fn for_count(count: usize) -> Option<Self> {
        let last = count.checked_sub(1)?;
        let rank = |pct: usize| (count * pct / 100).min(last);
        Some(Self {
            count,
            p90: rank(90),
            p95: rank(95),
            p99: rank(99),
        })
    }
}

/// Summarises an ascending sample array.
///
/// `sorted.len()` must equal `ranks.count`.
#[must_use]
pub fn summarize(name: impl Into<String>, sorted: &[Duration], ranks: PercentileRanks) -> StageStats {
    debug_assert_eq!(sorted.len(), ranks.count);
    debug_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));

    let sum: u128 = sorted.iter().map(Duration::as_nanos).sum();
    StageStats {
        name: name.into(),
        samples: ranks.count,
        average: duration_from_nanos(sum / ranks.count as u128),
        p90: sorted[ranks.p90],
        p95: sorted[ranks.p95],
        p99: sorted[ranks.p99],
    }
}

fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    // Remainder is below one billion.
    let subsec = (nanos % NANOS_PER_SEC) as u32;
    Duration::new(secs, subsec)
}

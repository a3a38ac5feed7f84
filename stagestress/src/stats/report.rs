//! Structured report and its text rendering.

use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Aggregates for one stage, or for the per-run total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStats {
    /// Stage name, or `total`.
    pub name: String,
    /// Number of samples aggregated.
    pub samples: usize,
    /// Truncated arithmetic mean.
    pub average: Duration,
    /// Value at the 90th percentile rank.
    pub p90: Duration,
    /// Value at the 95th percentile rank.
    pub p95: Duration,
    /// Value at the 99th percentile rank.
    pub p99: Duration,
}

impl StageStats {
    fn write_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "average: {:?}", self.average)?;
        writeln!(f, "pct90: {:?}", self.p90)?;
        writeln!(f, "pct95: {:?}", self.p95)?;
        writeln!(f, "pct99: {:?}", self.p99)?;
        writeln!(f)
    }
}

/// Result of a statistics pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Per-stage aggregates in registration order.
    pub stages: Vec<StageStats>,
    /// Aggregate of per-run summed durations, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<StageStats>,
    /// Runs that passed the filter.
    pub valid_count: usize,
    /// Runs present in the store before filtering.
    pub recorded_runs: usize,
}

impl Report {
    /// Returns the aggregates for the stage at `index`.
    #[must_use]
    pub fn stage(&self, index: usize) -> Option<&StageStats> {
        self.stages.get(index)
    }

    /// Serializes the report as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stage in &self.stages {
            writeln!(f, "stage - {}", stage.name)?;
            writeln!(f, "-----")?;
            stage.write_body(f)?;
        }
        if let Some(ref total) = self.total {
            writeln!(f, "total")?;
            writeln!(f, "-----")?;
            total.write_body(f)?;
        }
        writeln!(f, "{} valid result", self.valid_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stats(name: &str, ms: u64) -> StageStats {
        StageStats {
            name: name.to_string(),
            samples: 2,
            average: Duration::from_millis(ms),
            p90: Duration::from_millis(ms + 1),
            p95: Duration::from_millis(ms + 2),
            p99: Duration::from_micros(ms * 1000 + 2500),
        }
    }

    #[test]
    fn test_display_format() {
        let report = Report {
            stages: vec![stats("login", 1)],
            total: Some(stats("total", 4)),
            valid_count: 2,
            recorded_runs: 3,
        };

        let expected = "\
stage - login
-----
average: 1ms
pct90: 2ms
pct95: 3ms
pct99: 3.5ms

total
-----
average: 4ms
pct90: 5ms
pct95: 6ms
pct99: 6.5ms

2 valid result
";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_display_without_total() {
        let report = Report {
            stages: vec![stats("a", 1), stats("b", 2)],
            total: None,
            valid_count: 2,
            recorded_runs: 2,
        };
        let text = report.to_string();
        assert!(text.contains("stage - a\n"));
        assert!(text.contains("stage - b\n"));
        assert!(!text.contains("total"));
        assert!(text.ends_with("2 valid result\n"));
    }

    #[test]
    fn test_to_json_skips_missing_total() {
        let report = Report {
            stages: vec![stats("a", 1)],
            total: None,
            valid_count: 1,
            recorded_runs: 1,
        };
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert!(json.get("total").is_none());
        assert_eq!(json["valid_count"], 1);
        assert_eq!(json["stages"][0]["name"], "a");
    }
}

//! Mock stages for testing.

use std::collections::HashSet;
use std::time::Duration;

use crate::core::OutcomeFlag;
use crate::stages::StageWork;

/// A stage that sleeps before returning a fixed flag.
#[derive(Debug, Clone, Copy)]
pub struct SlowStage {
    delay: Duration,
    flag: OutcomeFlag,
}

impl SlowStage {
    /// Creates a new slow stage.
    #[must_use]
    pub fn new(delay: Duration, flag: OutcomeFlag) -> Self {
        Self { delay, flag }
    }
}

impl StageWork for SlowStage {
    fn execute(&self, _run_index: usize) -> OutcomeFlag {
        std::thread::sleep(self.delay);
        self.flag
    }
}

/// A stage that panics for selected runs and returns a flag otherwise.
#[derive(Debug, Clone)]
pub struct PanickingStage {
    runs: HashSet<usize>,
    flag: OutcomeFlag,
}

impl PanickingStage {
    /// Panics on every run.
    #[must_use]
    pub fn always() -> Self {
        Self {
            runs: HashSet::new(),
            flag: 0,
        }
    }

    /// Panics only on the given runs.
    #[must_use]
    pub fn on_runs(runs: impl IntoIterator<Item = usize>, flag: OutcomeFlag) -> Self {
        Self {
            runs: runs.into_iter().collect(),
            flag,
        }
    }
}

impl StageWork for PanickingStage {
    fn execute(&self, run_index: usize) -> OutcomeFlag {
        if self.runs.is_empty() || self.runs.contains(&run_index) {
            panic!("stage panicked on run {run_index}");
        }
        self.flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_stage_returns_flag() {
        let stage = SlowStage::new(Duration::from_millis(1), 3);
        assert_eq!(stage.execute(0), 3);
    }

    #[test]
    fn test_panicking_stage_selective() {
        let stage = PanickingStage::on_runs([2], 1);
        assert_eq!(stage.execute(1), 1);
        let result = std::panic::catch_unwind(|| stage.execute(2));
        assert!(result.is_err());
    }

    #[test]
    fn test_panicking_stage_always() {
        let stage = PanickingStage::always();
        assert!(std::panic::catch_unwind(|| stage.execute(0)).is_err());
        assert!(std::panic::catch_unwind(|| stage.execute(41)).is_err());
    }
}

//! Probes observing the scheduler from inside stage callbacks.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Tracks how many runs are between their first and last stage.
///
/// Call [`enter`](Self::enter) at the start of the first stage and
/// [`exit`](Self::exit) at the end of the last one.
#[derive(Debug, Default)]
pub struct ConcurrencyProbe {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    entered: AtomicUsize,
}

impl ConcurrencyProbe {
    /// Creates a new probe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a run as executing.
    pub fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.entered.fetch_add(1, Ordering::SeqCst);
    }

    /// Marks a run as finished.
    pub fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    /// Highest number of simultaneously executing runs seen.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Runs currently executing.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Total runs that entered.
    #[must_use]
    pub fn entered(&self) -> usize {
        self.entered.load(Ordering::SeqCst)
    }
}

/// Records the stage sequence observed for each run.
#[derive(Debug, Default)]
pub struct StageOrderProbe {
    seen: Mutex<HashMap<usize, Vec<usize>>>,
}

impl StageOrderProbe {
    /// Creates a new probe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `stage` executed for `run`.
    pub fn observe(&self, run: usize, stage: usize) {
        self.seen.lock().entry(run).or_default().push(stage);
    }

    /// Stage sequence recorded for `run`.
    #[must_use]
    pub fn sequence(&self, run: usize) -> Vec<usize> {
        self.seen.lock().get(&run).cloned().unwrap_or_default()
    }

    /// Number of runs observed.
    #[must_use]
    pub fn runs(&self) -> usize {
        self.seen.lock().len()
    }

    /// Runs whose sequence is not exactly `0..stage_count`.
    #[must_use]
    pub fn out_of_order(&self, stage_count: usize) -> Vec<usize> {
        let expected: Vec<usize> = (0..stage_count).collect();
        let mut runs: Vec<usize> = self
            .seen
            .lock()
            .iter()
            .filter(|(_, seq)| **seq != expected)
            .map(|(run, _)| *run)
            .collect();
        runs.sort_unstable();
        runs
    }
}

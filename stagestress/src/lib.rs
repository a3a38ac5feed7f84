//! # Stagestress
//!
//! A stress-test harness that keeps a fixed number of concurrent runs in
//! flight, times every stage of every run, and reports latency statistics.
//!
//! Stagestress provides:
//!
//! - **Stage registration**: An ordered sequence of named stages, each an opaque callback
//!   `run_index -> outcome flag`
//! - **Fixed-concurrency scheduling**: Exactly `concurrency` runs execute at once until
//!   `total` runs have started
//! - **Outcome filtering**: Per-stage bitmasks select which runs enter the statistics
//! - **Latency statistics**: Truncated mean and nearest-rank 90th/95th/99th percentiles per
//!   stage and for the per-run total
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stagestress::prelude::*;
//!
//! let mut harness = Harness::new();
//! harness.register_stage("connect", |_run: usize| 1_u64)?;
//! harness.register_stage("query", |run: usize| if run % 10 == 0 { 2_u64 } else { 1 })?;
//!
//! harness.run(8, 1_000)?;
//!
//! // Only runs whose query stage returned 1.
//! harness.report([1, 1], true)?;
//! # Ok::<(), stagestress::errors::HarnessError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod harness;
pub mod observability;
pub mod results;
pub mod scheduler;
pub mod stages;
pub mod stats;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{FailureMode, HarnessConfig};
    pub use crate::core::{FilterMask, OutcomeFlag, StageRecord};
    pub use crate::errors::{
        CallbackFailure, ConfigurationError, EmptyResultError, HarnessError,
    };
    pub use crate::harness::Harness;
    pub use crate::results::{RawResults, ResultStore};
    pub use crate::scheduler::{RunSummary, Scheduler};
    pub use crate::stages::{FixedOutcome, Stage, StageRegistry, StageWork};
    pub use crate::stats::{Report, StageStats, StatsReporter};
}

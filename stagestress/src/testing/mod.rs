//! Testing utilities for stress harness users.
//!
//! This module provides:
//! - Mock stages (slow, panicking)
//! - Probes that observe scheduling behaviour from inside stage callbacks

mod mocks;
mod probes;

pub use mocks::{PanickingStage, SlowStage};
pub use probes::{ConcurrencyProbe, StageOrderProbe};

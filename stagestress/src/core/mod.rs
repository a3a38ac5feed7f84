//! Core domain model types.
//!
//! This module contains the value types shared by the scheduler and the
//! statistics engine:
//! - Outcome flags and per-stage filter masks
//! - Per (run, stage) measurement records

mod flags;
mod record;

pub use flags::{FilterMask, OutcomeFlag};
pub use record::StageRecord;

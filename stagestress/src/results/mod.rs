//! Measurement storage.
//!
//! The [`ResultStore`] holds one pre-allocated slot per run index. A worker
//! fills a run's records locally and publishes them in one step, so readers
//! never see a partially executed run.

mod store;

pub use store::{RawResults, ResultStore};

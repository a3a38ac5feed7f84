//! Installation of a global `tracing` subscriber.
//!
//! The harness only emits events; installing a subscriber is left to the
//! caller. These helpers cover the common case of logging to stderr with a
//! `RUST_LOG` style filter.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns false if a global subscriber was already set.
pub fn init_tracing() -> bool {
    init_tracing_with(LogFormat::Pretty, "info")
}

/// Installs a stderr subscriber with an explicit format and fallback filter.
///
/// `RUST_LOG` takes precedence over `default_filter` when set. Only the
/// first call has an effect.
pub fn init_tracing_with(format: LogFormat, default_filter: &str) -> bool {
    *INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_thread_names(true);
        let result = match format {
            LogFormat::Pretty => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
        result.is_ok()
    })
}

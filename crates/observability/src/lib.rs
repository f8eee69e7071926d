//! Tracing/logging setup shared by binaries and tests that embed jobkit.
//!
//! Library crates only emit `tracing` events; installing a subscriber is left
//! to the process, through [`init`] or [`init_with`].

/// Subscriber configuration (filter directives, output format).
pub mod config;

/// Subscriber installation.
pub mod tracing;

pub use config::{LogFormat, ObservabilityConfig, ObservabilityError};

/// Initialize process-wide tracing from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(&ObservabilityConfig::from_env());
}

/// Initialize process-wide tracing with an explicit configuration.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_with(config: &ObservabilityConfig) -> bool {
    tracing::init(config)
}

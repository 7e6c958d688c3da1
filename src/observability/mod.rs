//! Observability subsystem
//!
//! Installs the process-wide `tracing` subscriber.
//!
//! # Principles
//!
//! 1. One subscriber per process; later calls are rejected, not ignored
//! 2. JSON lines in `production`, human-readable output elsewhere
//! 3. Level comes from `RUST_LOG`, defaulting to `info` plus request traces

use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment tag that switches output to JSON
pub const PRODUCTION_ENV: &str = "production";

const DEFAULT_FILTER: &str = "info,tower_http=debug";

/// Observability error
///
/// Observability failure is reported to the caller and never panics.
#[derive(Debug, Error)]
#[error("logging init failed: {0}")]
pub struct ObservabilityError(String);

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;

/// Install the global subscriber for the given environment tag.
pub fn init_logging(env: &str) -> ObservabilityResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = if uses_json(env) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| ObservabilityError(e.to_string()))
}

fn uses_json(env: &str) -> bool {
    env.eq_ignore_ascii_case(PRODUCTION_ENV)
}

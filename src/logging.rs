//! Log setup for the `batchctl` binary.
//!
//! `RUST_LOG` takes precedence over `--log-level`; both use `EnvFilter`
//! directive syntax (e.g. `info`, `batch_helpers::cluster=debug`).

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub const DEFAULT_FILTER: &str = "info";

/// Resolve the filter directives to use.
pub fn build_filter(level: Option<&str>) -> Result<EnvFilter, AppError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directives = level.unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_new(directives)
        .map_err(|e| AppError::input(format!("Invalid log filter '{directives}': {e}")))
}

/// Install a stderr fmt subscriber. Safe to call more than once.
pub fn init(level: Option<&str>) -> Result<(), AppError> {
    let filter = build_filter(level)?;
    // A second call (tests, embedding) finds a subscriber already set; that is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    Ok(())
}

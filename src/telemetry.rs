//! Tracing subscriber installation for hosts embedding the pipeline.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Error raised when the global subscriber cannot be installed.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive is malformed.
    #[error("invalid log filter {directive:?}: {message}")]
    InvalidFilter {
        /// Directive that failed to parse.
        directive: String,
        /// Parser message.
        message: String,
    },

    /// A global subscriber is already installed.
    #[error("tracing subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Builds the event filter: `RUST_LOG` when set, else `directive`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when `directive` is malformed.
pub fn build_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(directive).map_err(|err| TelemetryError::InvalidFilter {
        directive: directive.to_owned(),
        message: err.to_string(),
    })
}

/// Installs a compact fmt subscriber as the global default.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the directive is malformed or a global
/// subscriber already exists.
pub fn init_tracing(directive: &str) -> Result<(), TelemetryError> {
    let filter = build_filter(directive)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInstalled(err.to_string()))
}

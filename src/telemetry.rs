//! Log subscriber setup.

use crate::settings::TelemetrySettings;
use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, filter::ParseError, fmt, layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured log level is not a valid filter directive.
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    /// A global subscriber was already installed.
    #[error("tracing subscriber already initialised: {0}")]
    AlreadyInitialised(#[from] tracing_subscriber::util::TryInitError),
}

/// Builds the level filter, preferring `RUST_LOG` over the configured level.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured level does not
/// parse.
pub fn filter(settings: &TelemetrySettings) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .map_err(TelemetryError::from)
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init(settings: &TelemetrySettings) -> Result<(), TelemetryError> {
    let output = if settings.json {
        fmt::layer().json().with_current_span(true).boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };
    Registry::default()
        .with(filter(settings)?)
        .with(output)
        .try_init()?;
    Ok(())
}

//! Runtime settings.
//!
//! Values come from built-in defaults overridden by `TASKBOARD__`-prefixed
//! environment variables, with `__` separating nested keys. For example
//! `TASKBOARD__SERVER__PORT=8080` or `TASKBOARD__DATABASE__URL=postgres://...`.
//! The database URL has no default and must always be supplied.

use config::{Config, ConfigError, Environment, Map};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "TASKBOARD";

/// Top-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// HTTP listener.
    pub server: ServerSettings,
    /// Database connection.
    pub database: DatabaseSettings,
    /// Backlog promotion schedule.
    pub backlog: BacklogSettings,
    /// Log output.
    pub telemetry: TelemetrySettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl ServerSettings {
    /// `host:port` string suitable for a TCP listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Connection URL, kept out of debug output.
    pub url: SecretString,
    /// Maximum pooled connections.
    pub pool_size: u32,
}

/// Backlog promotion schedule.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BacklogSettings {
    /// Seconds between promotion passes.
    pub interval_secs: u64,
}

impl BacklogSettings {
    /// Interval between promotion passes.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    /// Default filter directive, used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or deserialised.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The backlog interval was zero.
    #[error("backlog.interval_secs must be positive")]
    ZeroBacklogInterval,
    /// The pool size was zero.
    #[error("database.pool_size must be positive")]
    ZeroPoolSize,
}

impl Settings {
    /// Loads settings from defaults and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a value is missing, malformed or out
    /// of range.
    pub fn load() -> Result<Self, SettingsError> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX).separator("__"))
    }

    /// Loads settings from defaults and an explicit variable map.
    ///
    /// Keys use the same `TASKBOARD__SECTION__KEY` form as the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a value is missing, malformed or out
    /// of range.
    pub fn from_vars(vars: Map<String, String>) -> Result<Self, SettingsError> {
        Self::from_environment(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .source(Some(vars)),
        )
    }

    fn from_environment(environment: Environment) -> Result<Self, SettingsError> {
        let settings: Self = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.pool_size", 8)?
            .set_default("backlog.interval_secs", 60)?
            .set_default("telemetry.log_level", "info")?
            .set_default("telemetry.json", false)?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()
    }

    fn validate(self) -> Result<Self, SettingsError> {
        if self.backlog.interval_secs == 0 {
            return Err(SettingsError::ZeroBacklogInterval);
        }
        if self.database.pool_size == 0 {
            return Err(SettingsError::ZeroPoolSize);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests;

//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod authorization;
pub mod database;
pub mod logging;
pub mod notifications;
pub mod realtime;

use serde::{Deserialize, Serialize};

pub use self::authorization::AuthorizationConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::notifications::NotificationsConfig;
pub use self::realtime::RealtimeConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// (default.toml + environment overlay + `BIZHUB__*` variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Permission evaluation settings.
    #[serde(default)]
    pub authorization: AuthorizationConfig,
    /// Notification dispatch settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Realtime push settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
}

impl AppConfig {
    /// Load configuration from a base TOML file.
    ///
    /// Merges the given base file with an optional `config/{env}` overlay
    /// (env taken from `BIZHUB_ENV`) and environment variables prefixed
    /// with `BIZHUB__`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let env = std::env::var("BIZHUB_ENV").unwrap_or_else(|_| "development".to_string());
        let base = path.trim_end_matches(".toml");

        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BIZHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

//! Server configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    /// Append received front-end log lines here when set.
    pub frontend_log_path: Option<PathBuf>,
    /// Single allowed CORS origin; any origin when `None`.
    pub cors_allow_origin: Option<String>,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `FRONTEND_LOG_PATH`: front-end log file, disabled when unset
    /// - `CORS_ALLOW_ORIGIN`: `*` (default) or one origin
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a number is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = non_empty(lookup("DATABASE_URL")).ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let port = env_parse(&lookup, "PORT", DEFAULT_PORT)?;
        let db_max_connections = env_parse(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        let frontend_log_path = non_empty(lookup("FRONTEND_LOG_PATH")).map(PathBuf::from);
        let cors_allow_origin = non_empty(lookup("CORS_ALLOW_ORIGIN")).filter(|origin| origin != "*");

        Ok(Self { database_url, port, db_max_connections, frontend_log_path, cors_allow_origin })
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match non_empty(lookup(var)) {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|_| ConfigError::Invalid { var, value }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Process configuration from environment variables (after `.env` is loaded).

use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/users";
pub const DEFAULT_LOG_FILTER: &str = "users_api=info,tower_http=info";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Run `CREATE TABLE IF NOT EXISTS users` at startup.
    pub bootstrap_schema: bool,
    /// Create the database named in `database_url` when missing.
    pub create_database: bool,
    pub body_limit_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: DEFAULT_DATABASE_URL.into(),
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            bootstrap_schema: true,
            create_database: true,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = AppConfig::default();
        let config = AppConfig {
            database_url: lookup("DATABASE_URL").unwrap_or(d.database_url),
            host: lookup("HOST").unwrap_or(d.host),
            port: parse_or(&lookup, "PORT", d.port)?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", d.max_connections)?,
            acquire_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                d.acquire_timeout.as_secs(),
            )?),
            bootstrap_schema: parse_bool_or(&lookup, "BOOTSTRAP_SCHEMA", d.bootstrap_schema)?,
            create_database: parse_bool_or(&lookup, "CREATE_DATABASE", d.create_database)?,
            body_limit_bytes: parse_or(&lookup, "BODY_LIMIT_BYTES", d.body_limit_bytes)?,
        };
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Validation("DATABASE_URL must not be empty".into()));
        }
        if self.port == 0 {
            return Err(ConfigError::Validation("PORT must be non-zero".into()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Validation("DB_MAX_CONNECTIONS must be at least 1".into()));
        }
        Ok(())
    }

    /// `host:port`, resolved by the listener (so host names such as `localhost` work).
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}

fn parse_bool_or<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value: v }),
        },
    }
}

//! Application configuration module
//!
//! `AppConfig` is read from the environment once at startup and passed by
//! reference to everything that needs it. Every key has a default except the
//! database URL, which is optional: without it the server runs on the
//! in-memory message store and auth endpoints are unavailable.
//!
//! | Key                   | Field                | Default   |
//! |-----------------------|----------------------|-----------|
//! | `SERVER_PORT`         | `port`               | 8080      |
//! | `DATABASE_URL`        | `database_url`       | unset     |
//! | `DB_MAX_CONNECTIONS`  | `db_max_connections` | 10        |
//! | `JWT_SECRET`          | `jwt_secret`         | dev value |
//! | `JWT_TTL_HOURS`       | `token_ttl_hours`    | 24 (max 8760) |
//! | `WS_OUTBOUND_BUFFER`  | `outbound_buffer`    | 64        |
//! | `WS_WRITE_TIMEOUT_MS` | `write_timeout_ms`   | 5000      |
//! | `WS_MAX_FRAME_BYTES`  | `max_frame_bytes`    | 65536     |

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Secret used when `JWT_SECRET` is not set. Never suitable for production.
pub const DEV_JWT_SECRET: &str = "instaspace-dev-secret-change-me";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_TOKEN_TTL_HOURS: u64 = 24;
/// One year
pub const MAX_TOKEN_TTL_HOURS: u64 = 24 * 365;
const DEFAULT_OUTBOUND_BUFFER: usize = 64;
const DEFAULT_WRITE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_MAX_FRAME_BYTES: usize = 64 * 1024;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// TCP port the HTTP server binds on all interfaces
    pub port: u16,
    /// PostgreSQL connection string
    pub database_url: Option<String>,
    /// Upper bound of the PostgreSQL pool
    pub db_max_connections: u32,
    /// HS256 signing secret for access and confirmation tokens
    pub jwt_secret: String,
    /// Lifetime of issued tokens
    pub token_ttl_hours: u64,
    /// Capacity of each connection's outbound queue
    pub outbound_buffer: usize,
    /// Upper bound on a single websocket write
    pub write_timeout_ms: u64,
    /// Largest accepted inbound websocket frame
    pub max_frame_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT_MS,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unset and empty keys fall back to
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let config = Self {
            port: parse_or(&get, "SERVER_PORT", defaults.port)?,
            database_url: get("DATABASE_URL"),
            db_max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            jwt_secret: get("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            token_ttl_hours: parse_or(&get, "JWT_TTL_HOURS", defaults.token_ttl_hours)?,
            outbound_buffer: parse_or(&get, "WS_OUTBOUND_BUFFER", defaults.outbound_buffer)?,
            write_timeout_ms: parse_or(&get, "WS_WRITE_TIMEOUT_MS", defaults.write_timeout_ms)?,
            max_frame_bytes: parse_or(&get, "WS_MAX_FRAME_BYTES", defaults.max_frame_bytes)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }
        if self.token_ttl_hours == 0 || self.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(ConfigError::InvalidValue {
                key: "JWT_TTL_HOURS",
                value: self.token_ttl_hours.to_string(),
            });
        }
        if self.outbound_buffer == 0 {
            return Err(ConfigError::InvalidValue {
                key: "WS_OUTBOUND_BUFFER",
                value: "0".to_string(),
            });
        }
        if self.write_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "WS_WRITE_TIMEOUT_MS",
                value: "0".to_string(),
            });
        }
        if self.max_frame_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "WS_MAX_FRAME_BYTES",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_hours.saturating_mul(60 * 60))
    }

    /// True when running on the built-in development secret
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(default),
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn db_max_connections(mut self, max: u32) -> Self {
        self.config.db_max_connections = max;
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    pub fn token_ttl_hours(mut self, hours: u64) -> Self {
        self.config.token_ttl_hours = hours;
        self
    }

    pub fn outbound_buffer(mut self, capacity: usize) -> Self {
        self.config.outbound_buffer = capacity;
        self
    }

    pub fn write_timeout_ms(mut self, millis: u64) -> Self {
        self.config.write_timeout_ms = millis;
        self
    }

    pub fn max_frame_bytes(mut self, bytes: usize) -> Self {
        self.config.max_frame_bytes = bytes;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}

// SPDX-License-Identifier: BUSL-1.1
//! # Runtime Configuration
//!
//! Read once from the environment at startup.
//!
//! | Variable                   | Default   |
//! |----------------------------|-----------|
//! | `MATCHDAY_HOST`            | `0.0.0.0` |
//! | `MATCHDAY_PORT`            | `8000`    |
//! | `DATABASE_URL`             | unset: in-memory store |
//! | `MATCHDAY_METRICS_ENABLED` | `true`    |
//! | `MATCHDAY_LOG_FORMAT`      | `text`    |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

/// Log output format for the subscriber installed by the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Application configuration.
///
/// Custom `Debug` redacts `database_url`, which usually embeds a password.
#[derive(Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub metrics_enabled: bool,
    pub log_format: LogFormat,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("metrics_enabled", &self.metrics_enabled)
            .field("log_format", &self.log_format)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout", &self.db_acquire_timeout)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            database_url: None,
            metrics_enabled: true,
            log_format: LogFormat::Text,
            db_max_connections: 20,
            db_acquire_timeout: Duration::from_secs(5),
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unset and empty values fall back
    /// to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get("MATCHDAY_HOST") {
            config.host = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "MATCHDAY_HOST",
                expected: "IP address",
                value: raw.clone(),
            })?;
        }

        if let Some(raw) = get("MATCHDAY_PORT") {
            config.port = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "MATCHDAY_PORT",
                expected: "port number",
                value: raw.clone(),
            })?;
        }

        config.database_url = get("DATABASE_URL");

        // Anything other than "false" keeps metrics on.
        if let Some(raw) = get("MATCHDAY_METRICS_ENABLED") {
            config.metrics_enabled = raw.trim().to_lowercase() != "false";
        }

        if let Some(raw) = get("MATCHDAY_LOG_FORMAT") {
            config.log_format = match raw.trim().to_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "MATCHDAY_LOG_FORMAT",
                        expected: "log format (text|json)",
                        value: raw,
                    })
                }
            };
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

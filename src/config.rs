//! Configuration types.

use crate::error::{ConfigError, Result};

/// Snapshot key used when `NUTRI_USER_KEY` is unset. One session per process.
pub const DEFAULT_USER_KEY: &str = "default";

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Key the session's profile snapshot is stored under.
    pub user_key: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            user_key: DEFAULT_USER_KEY.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read `NUTRI_HOST`, `NUTRI_PORT` and `NUTRI_USER_KEY`, falling back to
    /// defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let host = lookup("NUTRI_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);

        let port = match lookup("NUTRI_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "NUTRI_PORT".to_string(),
                message: format!("{raw:?} is not a port number: {e}"),
            })?,
            None => defaults.port,
        };

        let user_key = lookup("NUTRI_USER_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.user_key);

        Ok(Self {
            host,
            port,
            user_key,
        })
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

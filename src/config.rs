//! Configuration Module
//!
//! Handles loading cache, session and server settings from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{MidwareError, Result};

/// Middleware stack configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the response cache can hold
    pub capacity: usize,
    /// Default TTL in seconds for entries stored without an explicit TTL
    pub default_ttl: u64,
    /// Session timeout in seconds handed to the session store
    pub session_timeout: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Directory served under `/self/`
    pub static_dir: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SESSION_TIMEOUT` - Session timeout in seconds (default: 600)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STATIC_DIR` - Directory served under `/self/` (default: `.`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env_or("CACHE_CAPACITY", defaults.capacity),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            session_timeout: env_or("SESSION_TIMEOUT", defaults.session_timeout),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            static_dir: env_or("STATIC_DIR", defaults.static_dir),
        }
    }

    /// Rejects settings the cache cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(MidwareError::InvalidConfig(
                "cache capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout)
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            default_ttl: 300,
            session_timeout: 600,
            server_port: 3000,
            static_dir: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.session_timeout, 600);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.static_dir, PathBuf::from("."));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("DEFAULT_TTL");
        env::remove_var("SESSION_TIMEOUT");
        env::remove_var("SERVER_PORT");
        env::remove_var("STATIC_DIR");

        let config = Config::from_env();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.default_ttl(), Duration::from_secs(300));
        assert_eq!(config.session_timeout(), Duration::from_secs(600));
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_rejects_zero_capacity() {
        let config = Config {
            capacity: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MidwareError::InvalidConfig(_))
        ));
    }
}

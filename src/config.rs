//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Lifetime of a memoized fetch result in seconds
    pub memo_ttl: u64,
    /// Maximum number of memoized fetch results held at once
    pub memo_max_entries: usize,
    /// Background purge task interval in seconds
    pub purge_interval: u64,
    /// Upstream request timeout in seconds
    pub fetch_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MEMO_TTL` - Memoized fetch lifetime in seconds (default: 10)
    /// - `MEMO_MAX_ENTRIES` - Memoizer capacity (default: 100)
    /// - `PURGE_INTERVAL` - Expired memo purge frequency in seconds (default: 1)
    /// - `FETCH_TIMEOUT` - Upstream request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            memo_ttl: env_or("MEMO_TTL", defaults.memo_ttl),
            memo_max_entries: env_or("MEMO_MAX_ENTRIES", defaults.memo_max_entries),
            purge_interval: env_or("PURGE_INTERVAL", defaults.purge_interval),
            fetch_timeout: env_or("FETCH_TIMEOUT", defaults.fetch_timeout),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            memo_ttl: 10,
            memo_max_entries: 100,
            purge_interval: 1,
            fetch_timeout: 30,
        }
    }
}

/// Reads `name` from the environment, falling back when unset or unparsable.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

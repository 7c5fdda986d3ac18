//! Configuration Module
//!
//! Handles loading cache settings from environment variables.

use std::env;
use std::time::Duration;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Background cleanup interval in milliseconds, 0 = lazy expiry only
    pub cleanup_interval_ms: u64,
    /// Number of entries the store pre-allocates room for
    pub initial_capacity: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CLEANUP_INTERVAL_MS` - Reaper frequency in milliseconds (default: 1000, 0 disables)
    /// - `INITIAL_CAPACITY` - Pre-allocated entry slots (default: 0)
    pub fn from_env() -> Self {
        Self {
            cleanup_interval_ms: env_or("CLEANUP_INTERVAL_MS", 1000),
            initial_capacity: env_or("INITIAL_CAPACITY", 0),
        }
    }

    /// Returns the reaper interval, or None when the reaper is disabled.
    pub fn cleanup_interval(&self) -> Option<Duration> {
        match self.cleanup_interval_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cleanup_interval_ms: 1000,
            initial_capacity: 0,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

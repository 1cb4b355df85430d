//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;

use crate::cache::DEFAULT_TTL_SECS;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in seconds for entries stored without an explicit TTL
    pub default_ttl: u64,
    /// Seconds between expiry sweeps
    pub sweep_interval: u64,
    /// Keys removed per write-lock acquisition during a sweep
    pub sweep_batch_size: usize,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 600)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 120)
    /// - `SWEEP_BATCH_SIZE` - Keys removed per lock acquisition (default: 64)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            sweep_interval: parse_var("SWEEP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.sweep_interval),
            sweep_batch_size: parse_var("SWEEP_BATCH_SIZE")
                .filter(|size| *size > 0)
                .unwrap_or(defaults.sweep_batch_size),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL_SECS,
            sweep_interval: 120,
            sweep_batch_size: 64,
            server_port: 3000,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::{Policy, DEFAULT_CAPACITY};
use crate::flag::Flag;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of compiled patterns the cache can hold
    pub capacity: usize,
    /// Eviction policy
    pub policy: Policy,
    /// Flag applied to every pattern compiled by the binary
    pub flag: Flag,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `RECACHE_CAPACITY` - Maximum cached patterns (default: 25, values below 1 use the default)
    /// - `RECACHE_POLICY` - `lru` or `lfu` (default: lru)
    /// - `RECACHE_FLAG` - `default`, `posix`, `must` or `mustposix` (default: default)
    pub fn from_env() -> Self {
        Self {
            capacity: env::var("RECACHE_CAPACITY")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .filter(|&capacity| capacity >= 1)
                .unwrap_or(DEFAULT_CAPACITY),
            policy: parse_env("RECACHE_POLICY").unwrap_or_default(),
            flag: parse_env("RECACHE_FLAG").unwrap_or_default(),
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            policy: Policy::Lru,
            flag: Flag::Default,
        }
    }
}

//! Cache Module
//!
//! Bounded caches for compiled patterns with LRU and LFU eviction.

mod entry;
mod lfu;
mod lru;
mod stats;
mod tracker;


use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use regex::Regex;
use serde::Serialize;

use crate::compile::{Compiler, RegexCompiler};
use crate::error::{CacheError, Result};
use crate::flag::Flag;

// Re-export public types
pub use entry::Entry;
pub use lfu::LfuCache;
pub use lru::LruCache;
pub use stats::CacheStats;
pub(crate) use stats::StatsRecorder;
pub(crate) use tracker::{LruTracker, NodeId};

// == Public Constants ==
/// Capacity used when none, or an invalid one, is supplied at construction.
pub const DEFAULT_CAPACITY: usize = 25;

// == Cache Contract ==
/// Storage for compiled patterns, shared by every eviction policy.
///
/// Implementations synchronize internally; share them behind an `Arc`.
pub trait Cache: Send + Sync {
    /// The compiled value handed out on `get`.
    type Artifact;

    /// Returns the compiled artifact for `pattern` under `flag`.
    ///
    /// A miss compiles the pattern and stores it, evicting as needed. A compile
    /// error is returned as is and leaves the cache untouched.
    fn get(&self, pattern: &str, flag: Flag) -> Result<Arc<Self::Artifact>>;

    /// Sets the maximum number of entries, evicting down to it if needed.
    ///
    /// Fails with [`CacheError::InvalidCapacity`] when `capacity` is 0.
    fn set_capacity(&self, capacity: usize) -> Result<()>;

    /// Maximum number of entries the cache holds.
    fn capacity(&self) -> usize;

    /// Number of entries currently held.
    fn size(&self) -> usize;

    /// Removes every entry. Capacity is unchanged.
    fn clear(&self);

    /// Snapshot of hit, miss and eviction counters.
    fn stats(&self) -> CacheStats;
}

// == Policy ==
/// Eviction policy picked at construction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Evict the least recently used entry
    #[default]
    Lru,
    /// Evict the least frequently used entry
    Lfu,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Lru => f.write_str("lru"),
            Policy::Lfu => f.write_str("lfu"),
        }
    }
}

impl FromStr for Policy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" | "recency" => Ok(Policy::Lru),
            "lfu" | "frequency" => Ok(Policy::Lfu),
            _ => Err(CacheError::UnknownPolicy(s.to_string())),
        }
    }
}

// == Factories ==
/// Builds a regex cache with the given policy.
///
/// A capacity of 0 falls back to [`DEFAULT_CAPACITY`].
pub fn new_cache(policy: Policy, capacity: usize) -> Box<dyn Cache<Artifact = Regex>> {
    new_cache_with(policy, capacity, RegexCompiler)
}

/// Builds a cache with the given policy around a custom compiler.
pub fn new_cache_with<C>(
    policy: Policy,
    capacity: usize,
    compiler: C,
) -> Box<dyn Cache<Artifact = C::Artifact>>
where
    C: Compiler + 'static,
{
    match policy {
        Policy::Lru => Box::new(LruCache::with_compiler(capacity, compiler)),
        Policy::Lfu => Box::new(LfuCache::with_compiler(capacity, compiler)),
    }
}

fn effective_capacity(capacity: usize) -> usize {
    if capacity < 1 {
        DEFAULT_CAPACITY
    } else {
        capacity
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_str() {
        assert_eq!("lru".parse::<Policy>().unwrap(), Policy::Lru);
        assert_eq!("LFU".parse::<Policy>().unwrap(), Policy::Lfu);
        assert_eq!("recency".parse::<Policy>().unwrap(), Policy::Lru);
        assert_eq!(" frequency".parse::<Policy>().unwrap(), Policy::Lfu);
        assert!(matches!(
            "mru".parse::<Policy>(),
            Err(CacheError::UnknownPolicy(_))
        ));
    }

    #[test]
    fn test_policy_display_round_trips() {
        for policy in [Policy::Lru, Policy::Lfu] {
            assert_eq!(policy.to_string().parse::<Policy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_new_cache_defaults_capacity() {
        for policy in [Policy::Lru, Policy::Lfu] {
            assert_eq!(new_cache(policy, 0).capacity(), DEFAULT_CAPACITY);
            assert_eq!(new_cache(policy, 100).capacity(), 100);
        }
    }

    #[test]
    fn test_new_cache_serves_regexes() {
        for policy in [Policy::Lru, Policy::Lfu] {
            let cache = new_cache(policy, 2);

            let regex = cache.get(r"^\d+$", Flag::Default).unwrap();

            assert!(regex.is_match("12345"));
            assert_eq!(cache.size(), 1);
        }
    }
}

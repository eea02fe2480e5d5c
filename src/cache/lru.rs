//! LRU Cache Module
//!
//! Pattern cache that evicts the least recently used entry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::cache::{effective_capacity, Cache, CacheStats, Entry, LruTracker, NodeId, StatsRecorder};
use crate::compile::{Compiler, RegexCompiler};
use crate::error::{CacheError, Result};
use crate::flag::Flag;
use crate::key::derive_key;

// == LRU Cache ==
/// Thread-safe LRU cache of compiled patterns.
///
/// Every `get` takes the write lock, since hits reorder the recency list.
pub struct LruCache<C: Compiler = RegexCompiler> {
    compiler: C,
    state: RwLock<LruState<C::Artifact>>,
    stats: StatsRecorder,
}

/// Index and recency order, always mutated together.
struct LruState<A> {
    index: HashMap<String, NodeId>,
    order: LruTracker<Entry<A>>,
    capacity: usize,
}

impl<A> LruState<A> {
    fn new(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            order: LruTracker::with_capacity(capacity),
            capacity,
        }
    }

    // Drops the back of the order list along with its index entry.
    fn evict_oldest(&mut self) -> Result<Entry<A>> {
        let entry = self
            .order
            .evict_oldest()
            .ok_or_else(|| CacheError::Internal("eviction from an empty order list".to_string()))?;

        if self.index.remove(entry.key()).is_none() {
            return Err(CacheError::Internal(format!(
                "evicted key {} was not indexed",
                entry.key()
            )));
        }
        Ok(entry)
    }
}

impl LruCache<RegexCompiler> {
    // == Constructor ==
    /// Creates a regex cache holding at most `capacity` patterns.
    ///
    /// A capacity of 0 falls back to [`DEFAULT_CAPACITY`](crate::cache::DEFAULT_CAPACITY).
    pub fn new(capacity: usize) -> Self {
        Self::with_compiler(capacity, RegexCompiler)
    }
}

impl<C: Compiler> LruCache<C> {
    /// Creates a cache that compiles misses with `compiler`.
    pub fn with_compiler(capacity: usize, compiler: C) -> Self {
        Self {
            compiler,
            state: RwLock::new(LruState::new(effective_capacity(capacity))),
            stats: StatsRecorder::new(),
        }
    }

    /// Whether the pattern is cached, without touching its recency.
    pub fn contains(&self, pattern: &str, flag: Flag) -> bool {
        self.state.read().index.contains_key(&derive_key(pattern, flag))
    }

    /// Cached patterns from most to least recently used.
    pub fn patterns(&self) -> Vec<String> {
        self.state
            .read()
            .order
            .iter()
            .map(|entry| entry.pattern().to_string())
            .collect()
    }
}

impl<C: Compiler> Cache for LruCache<C> {
    type Artifact = C::Artifact;

    fn get(&self, pattern: &str, flag: Flag) -> Result<Arc<C::Artifact>> {
        let key = derive_key(pattern, flag);
        let mut state = self.state.write();

        if let Some(&id) = state.index.get(&key) {
            if !state.order.touch(id) {
                return Err(CacheError::Internal(format!(
                    "indexed key {} missing from order list",
                    key
                )));
            }
            let entry = state.order.get(id).ok_or_else(|| {
                CacheError::Internal(format!("indexed key {} missing from order list", key))
            })?;

            let (artifact, _) = entry.load();
            self.stats.record_hit();
            debug!("LRU hit: key={}", key);
            return Ok(artifact);
        }

        self.stats.record_miss();
        debug!("LRU miss: key={}, compiling {:?}", key, pattern);

        let artifact = match self.compiler.compile(pattern, flag) {
            Ok(artifact) => Arc::new(artifact),
            Err(err) => {
                self.stats.record_compile_error();
                return Err(err.into());
            }
        };
        let entry =
            Entry::new(key.as_str(), pattern, Arc::clone(&artifact)).ok_or(CacheError::InvalidEntry)?;

        let id = state.order.push_front(entry);
        state.index.insert(key, id);

        // A single insert can overshoot capacity by at most one
        if state.order.len() > state.capacity {
            let evicted = state.evict_oldest()?;
            self.stats.record_eviction();
            debug!("LRU evicted: key={}", evicted.key());
        }

        Ok(artifact)
    }

    fn set_capacity(&self, capacity: usize) -> Result<()> {
        if capacity < 1 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        let mut state = self.state.write();
        let mut evicted = 0;
        while state.order.len() > capacity {
            state.evict_oldest()?;
            self.stats.record_eviction();
            evicted += 1;
        }
        state.capacity = capacity;

        info!("LRU capacity set to {} ({} entries evicted)", capacity, evicted);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.state.read().capacity
    }

    fn size(&self) -> usize {
        self.state.read().order.len()
    }

    fn clear(&self) {
        let mut state = self.state.write();
        state.order.clear();
        state.index.clear();
        info!("LRU cache cleared");
    }

    fn stats(&self) -> CacheStats {
        let state = self.state.read();
        self.stats.snapshot(state.order.len(), state.capacity)
    }
}

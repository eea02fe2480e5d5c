//! LFU Cache Module
//!
//! Pattern cache that evicts the entry with the lowest usage count.
//!
//! Eviction scans every entry, so it costs O(n) against the LRU cache's O(1).
//! Counts never age: an entry that was hot long ago keeps its count.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::cache::{effective_capacity, Cache, CacheStats, Entry, StatsRecorder};
use crate::compile::{Compiler, RegexCompiler};
use crate::error::{CacheError, Result};
use crate::flag::Flag;
use crate::key::derive_key;

// == LFU Cache ==
/// Thread-safe LFU cache of compiled patterns.
///
/// Hits only need the read lock: usage counters are atomic and the eviction
/// scan runs under the write lock, so it always sees the latest counts. Among
/// entries with equal usage the one inserted first is evicted.
///
/// Shrinking the capacity evicts eagerly, just like the LRU cache.
pub struct LfuCache<C: Compiler = RegexCompiler> {
    compiler: C,
    state: RwLock<LfuState<C::Artifact>>,
    stats: StatsRecorder,
}

struct Slot<A> {
    entry: Entry<A>,
    /// Insertion sequence, breaks ties between equal usage counts
    seq: u64,
}

struct LfuState<A> {
    index: HashMap<String, Slot<A>>,
    capacity: usize,
    next_seq: u64,
}

impl<A> LfuState<A> {
    fn new(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            capacity,
            next_seq: 0,
        }
    }

    fn hit(&self, key: &str) -> Option<Arc<A>> {
        self.index.get(key).map(|slot| slot.entry.load().0)
    }

    fn insert(&mut self, entry: Entry<A>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(entry.key().to_string(), Slot { entry, seq });
    }

    // Removes the entry with the lowest (usage, seq).
    fn evict_least_used(&mut self) -> Option<Entry<A>> {
        let victim = self
            .index
            .iter()
            .min_by_key(|(_, slot)| (slot.entry.usage(), slot.seq))
            .map(|(key, _)| key.clone())?;

        self.index.remove(&victim).map(|slot| slot.entry)
    }
}

impl LfuCache<RegexCompiler> {
    // == Constructor ==
    /// Creates a regex cache holding at most `capacity` patterns.
    ///
    /// A capacity of 0 falls back to [`DEFAULT_CAPACITY`](crate::cache::DEFAULT_CAPACITY).
    pub fn new(capacity: usize) -> Self {
        Self::with_compiler(capacity, RegexCompiler)
    }
}

impl<C: Compiler> LfuCache<C> {
    /// Creates a cache that compiles misses with `compiler`.
    pub fn with_compiler(capacity: usize, compiler: C) -> Self {
        Self {
            compiler,
            state: RwLock::new(LfuState::new(effective_capacity(capacity))),
            stats: StatsRecorder::new(),
        }
    }

    /// Whether the pattern is cached, without counting a use.
    pub fn contains(&self, pattern: &str, flag: Flag) -> bool {
        self.state.read().index.contains_key(&derive_key(pattern, flag))
    }

    /// Usage count of a cached pattern.
    pub fn usage(&self, pattern: &str, flag: Flag) -> Option<u64> {
        self.state
            .read()
            .index
            .get(&derive_key(pattern, flag))
            .map(|slot| slot.entry.usage())
    }
}

impl<C: Compiler> Cache for LfuCache<C> {
    type Artifact = C::Artifact;

    fn get(&self, pattern: &str, flag: Flag) -> Result<Arc<C::Artifact>> {
        let key = derive_key(pattern, flag);

        if let Some(artifact) = self.state.read().hit(&key) {
            self.stats.record_hit();
            debug!("LFU hit: key={}", key);
            return Ok(artifact);
        }

        let mut state = self.state.write();

        // Another thread may have compiled it between the two locks
        if let Some(artifact) = state.hit(&key) {
            self.stats.record_hit();
            debug!("LFU hit: key={}", key);
            return Ok(artifact);
        }

        self.stats.record_miss();
        debug!("LFU miss: key={}, compiling {:?}", key, pattern);

        let artifact = match self.compiler.compile(pattern, flag) {
            Ok(artifact) => Arc::new(artifact),
            Err(err) => {
                self.stats.record_compile_error();
                return Err(err.into());
            }
        };
        let entry =
            Entry::new(key.as_str(), pattern, Arc::clone(&artifact)).ok_or(CacheError::InvalidEntry)?;

        while state.index.len() >= state.capacity {
            match state.evict_least_used() {
                Some(evicted) => {
                    self.stats.record_eviction();
                    debug!(
                        "LFU evicted: key={}, usage={}",
                        evicted.key(),
                        evicted.usage()
                    );
                }
                None => break,
            }
        }
        state.insert(entry);

        Ok(artifact)
    }

    fn set_capacity(&self, capacity: usize) -> Result<()> {
        if capacity < 1 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        let mut state = self.state.write();
        let mut evicted = 0;
        while state.index.len() > capacity {
            if state.evict_least_used().is_none() {
                break;
            }
            self.stats.record_eviction();
            evicted += 1;
        }
        state.capacity = capacity;

        info!("LFU capacity set to {} ({} entries evicted)", capacity, evicted);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.state.read().capacity
    }

    fn size(&self) -> usize {
        self.state.read().index.len()
    }

    fn clear(&self) {
        self.state.write().index.clear();
        info!("LFU cache cleared");
    }

    fn stats(&self) -> CacheStats {
        let state = self.state.read();
        self.stats.snapshot(state.index.len(), state.capacity)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DEFAULT_CAPACITY;
    use crate::error::CompileError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Compiler double that counts calls and rejects patterns starting with '['.
    #[derive(Default)]
    struct CountingCompiler {
        calls: AtomicUsize,
    }

    impl Compiler for CountingCompiler {
        type Artifact = String;

        fn compile(&self, pattern: &str, _flag: Flag) -> std::result::Result<String, CompileError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if pattern.starts_with('[') {
                return Err(CompileError::Invalid(pattern.to_string()));
            }
            Ok(pattern.to_uppercase())
        }
    }

    fn counting_cache(capacity: usize) -> (LfuCache<Arc<CountingCompiler>>, Arc<CountingCompiler>) {
        let compiler = Arc::new(CountingCompiler::default());
        (LfuCache::with_compiler(capacity, Arc::clone(&compiler)), compiler)
    }

    fn get_times(cache: &LfuCache<Arc<CountingCompiler>>, pattern: &str, times: usize) {
        for _ in 0..times {
            cache.get(pattern, Flag::Default).unwrap();
        }
    }

    #[test]
    fn test_new_capacity() {
        assert_eq!(LfuCache::new(DEFAULT_CAPACITY).capacity(), DEFAULT_CAPACITY);
        assert_eq!(LfuCache::new(100).capacity(), 100);
        assert_eq!(LfuCache::new(0).capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_hits_count_usage() {
        let (cache, compiler) = counting_cache(3);

        let first = cache.get("abc", Flag::Default).unwrap();
        get_times(&cache, "abc", 3);
        let last = cache.get("abc", Flag::Default).unwrap();

        // The inserting miss does not count as a use
        assert_eq!(cache.usage("abc", Flag::Default), Some(4));
        assert!(Arc::ptr_eq(&first, &last));
        assert_eq!(compiler.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_evicts_least_used() {
        let (cache, _) = counting_cache(2);

        get_times(&cache, "a", 1);
        get_times(&cache, "b", 1);
        get_times(&cache, "a", 2);
        get_times(&cache, "c", 1);

        assert!(cache.contains("a", Flag::Default));
        assert!(!cache.contains("b", Flag::Default));
        assert!(cache.contains("c", Flag::Default));
        assert_eq!(cache.size(), 2);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_ties_evict_oldest_insertion() {
        let (cache, _) = counting_cache(3);

        get_times(&cache, "a", 1);
        get_times(&cache, "b", 1);
        get_times(&cache, "c", 1);
        get_times(&cache, "d", 1);

        assert!(!cache.contains("a", Flag::Default));

        get_times(&cache, "e", 1);
        assert!(!cache.contains("b", Flag::Default));
        assert!(cache.contains("c", Flag::Default));
        assert!(cache.contains("d", Flag::Default));
        assert!(cache.contains("e", Flag::Default));
    }

    #[test]
    fn test_contains_does_not_count_usage() {
        let (cache, _) = counting_cache(2);
        get_times(&cache, "a", 1);

        assert!(cache.contains("a", Flag::Default));
        assert_eq!(cache.usage("a", Flag::Default), Some(0));
        assert_eq!(cache.usage("b", Flag::Default), None);
    }

    #[test]
    fn test_compile_error_never_evicts() {
        let (cache, _) = counting_cache(1);
        get_times(&cache, "a", 1);

        for _ in 0..3 {
            assert!(matches!(
                cache.get("[", Flag::Default),
                Err(CacheError::Compile(_))
            ));
        }

        assert_eq!(cache.size(), 1);
        assert!(cache.contains("a", Flag::Default));
        assert_eq!(cache.stats().compile_errors, 3);
    }

    #[test]
    fn test_empty_pattern_is_invalid_entry() {
        let (cache, _) = counting_cache(1);
        get_times(&cache, "a", 1);

        assert!(matches!(
            cache.get("", Flag::Default),
            Err(CacheError::InvalidEntry)
        ));
        assert!(cache.contains("a", Flag::Default));
    }

    #[test]
    fn test_set_capacity_evicts_eagerly() {
        let (cache, _) = counting_cache(4);
        get_times(&cache, "a", 3);
        get_times(&cache, "b", 1);
        get_times(&cache, "c", 2);
        get_times(&cache, "d", 4);

        cache.set_capacity(2).unwrap();

        assert_eq!(cache.capacity(), 2);
        assert_eq!(cache.size(), 2);
        assert!(cache.contains("a", Flag::Default));
        assert!(cache.contains("d", Flag::Default));
    }

    #[test]
    fn test_set_capacity_zero_fails() {
        let (cache, _) = counting_cache(2);
        get_times(&cache, "a", 1);

        assert!(matches!(
            cache.set_capacity(0),
            Err(CacheError::InvalidCapacity(0))
        ));
        assert_eq!(cache.capacity(), 2);
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_clear() {
        let (cache, _) = counting_cache(3);
        get_times(&cache, "a", 1);
        get_times(&cache, "b", 1);

        cache.clear();

        assert_eq!(cache.size(), 0);
        assert_eq!(cache.capacity(), 3);
        assert!(!cache.contains("a", Flag::Default));
    }

    #[test]
    fn test_regex_cache_with_flags() {
        let cache = LfuCache::new(3);

        cache.get("^hello", Flag::Posix).unwrap();
        cache.get("^world", Flag::MustPosix).unwrap();

        assert_eq!(cache.size(), 2);
        assert!(cache.contains("^hello", Flag::Posix));
        assert!(!cache.contains("^hello", Flag::Default));
    }
}

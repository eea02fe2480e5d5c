//! Cache Entry Module
//!
//! Defines the record a cache keeps for each compiled pattern.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// == Entry ==
/// A compiled artifact together with its pattern, key and usage counter.
///
/// The usage counter is atomic so it can be bumped while the owning cache
/// only holds a shared lock.
#[derive(Debug)]
pub struct Entry<A> {
    key: String,
    pattern: String,
    artifact: Arc<A>,
    usage: AtomicU64,
}

impl<A> Entry<A> {
    // == Constructor ==
    /// Creates a new entry with a usage count of zero.
    ///
    /// Returns `None` when `pattern` is empty.
    pub fn new(key: impl Into<String>, pattern: impl Into<String>, artifact: Arc<A>) -> Option<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return None;
        }

        Some(Self {
            key: key.into(),
            pattern,
            artifact,
            usage: AtomicU64::new(0),
        })
    }

    // == Load ==
    /// Returns the artifact and pattern, counting one use.
    pub fn load(&self) -> (Arc<A>, &str) {
        self.usage.fetch_add(1, Ordering::Relaxed);
        (Arc::clone(&self.artifact), &self.pattern)
    }

    /// Returns the artifact without counting a use.
    pub fn artifact(&self) -> &Arc<A> {
        &self.artifact
    }

    /// The source pattern the artifact was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Cache key derived from the pattern and flag.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of times the entry has been loaded.
    pub fn usage(&self) -> u64 {
        self.usage.load(Ordering::Relaxed)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const PATTERN: &str = r"^[a-z]+$";

    #[test]
    fn test_entry_creation() {
        let entry = Entry::new("test_key", PATTERN, Arc::new(42)).unwrap();

        assert_eq!(entry.key(), "test_key");
        assert_eq!(entry.pattern(), PATTERN);
        assert_eq!(**entry.artifact(), 42);
        assert_eq!(entry.usage(), 0);
    }

    #[test]
    fn test_entry_rejects_empty_pattern() {
        assert!(Entry::new("test_key", "", Arc::new(42)).is_none());
    }

    #[test]
    fn test_load_returns_shared_artifact() {
        let artifact = Arc::new(String::from("compiled"));
        let entry = Entry::new("test_key", PATTERN, Arc::clone(&artifact)).unwrap();

        let (loaded, pattern) = entry.load();

        assert!(Arc::ptr_eq(&loaded, &artifact));
        assert_eq!(pattern, PATTERN);
        assert_eq!(entry.usage(), 1);
    }

    #[test]
    fn test_usage_counts_every_load() {
        let entry = Entry::new("test_key", PATTERN, Arc::new(())).unwrap();

        for _ in 0..4 {
            entry.load();
        }

        assert_eq!(entry.usage(), 4);
    }

    #[test]
    fn test_artifact_does_not_count_usage() {
        let entry = Entry::new("test_key", PATTERN, Arc::new(())).unwrap();

        let _ = entry.artifact();

        assert_eq!(entry.usage(), 0);
    }

    #[test]
    fn test_concurrent_loads() {
        let entry = Arc::new(Entry::new("test_key", PATTERN, Arc::new(())).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let entry = Arc::clone(&entry);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        entry.load();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(entry.usage(), 8000);
    }
}

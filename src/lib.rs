//! recache - Bounded caches for compiled regular expressions
//!
//! Compiles a pattern once and serves it from an LRU or LFU cache afterwards.
//!
//! ```
//! use recache::{Cache, Flag, LruCache};
//!
//! let cache = LruCache::new(10);
//! let regex = cache.get(r"^\d{4}$", Flag::Default).unwrap();
//! assert!(regex.is_match("2024"));
//!
//! // Served from the cache, no recompilation
//! let again = cache.get(r"^\d{4}$", Flag::Default).unwrap();
//! assert!(std::sync::Arc::ptr_eq(&regex, &again));
//! ```

pub mod cache;
pub mod compile;
pub mod config;
pub mod error;
pub mod flag;
pub mod key;

pub use cache::{new_cache, new_cache_with, Cache, CacheStats, LfuCache, LruCache, Policy};
pub use compile::{Compiler, RegexCompiler};
pub use config::Config;
pub use error::{CacheError, CompileError, Result};
pub use flag::Flag;
pub use key::derive_key;

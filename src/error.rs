//! Error types for the pattern cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Compile Error ==
/// Failure reported by a [`Compiler`](crate::compile::Compiler) for a
/// malformed pattern.
#[derive(Error, Debug)]
pub enum CompileError {
    /// The regex engine rejected the pattern
    #[error(transparent)]
    Syntax(#[from] regex::Error),

    /// The pattern uses syntax outside POSIX ERE
    #[error("{construct} is not allowed in POSIX syntax")]
    NotPosix { construct: &'static str },

    /// Rejection reported by a custom compiler
    #[error("invalid pattern: {0}")]
    Invalid(String),
}

// == Cache Error Enum ==
/// Unified error type for the pattern cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Capacity below 1 passed to `set_capacity`
    #[error("invalid capacity: {0}")]
    InvalidCapacity(usize),

    /// The compiler rejected the pattern
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// An entry could not be built from the compiled pattern
    #[error("invalid entry")]
    InvalidEntry,

    /// Index and eviction order disagree
    #[error("internal error: {0}")]
    Internal(String),

    /// Unrecognised flag name
    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    /// Unrecognised eviction policy name
    #[error("unknown policy: {0}")]
    UnknownPolicy(String),
}

// == Result Type Alias ==
/// Convenience Result type for the pattern cache.
pub type Result<T> = std::result::Result<T, CacheError>;

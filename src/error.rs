//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for every cache backing.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No live value exists for the key: never set, deleted, or expired.
    #[error("cache: key not found")]
    KeyNotFound,

    /// Opaque failure reported by a backing store
    #[error("cache backend: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CacheError {
    /// Returns true for the "not found" miss, which callers branch on in normal operation.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, CacheError::KeyNotFound)
    }

    /// Wraps an arbitrary backing-store failure.
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        CacheError::Backend(err.into())
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

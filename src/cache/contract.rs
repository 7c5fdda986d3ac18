//! Cache Contract Module
//!
//! The capability interface callers depend on, independent of the backing store.

use std::time::Duration;

use async_trait::async_trait;

use crate::cache::Context;
use crate::error::Result;

// == Cache Trait ==
/// Get/Set/Del over string keys with per-entry TTL.
///
/// Object safe, so callers can hold an `Arc<dyn Cache<V>>` and swap the
/// backing without changes.
#[async_trait]
pub trait Cache<V>: Send + Sync
where
    V: Send + 'static,
{
    /// Returns the live value for `key`.
    ///
    /// Fails with [`CacheError::KeyNotFound`](crate::error::CacheError::KeyNotFound)
    /// when the key was never set, was deleted, or its TTL has elapsed.
    /// Never extends the entry's TTL.
    async fn get(&self, ctx: &Context, key: &str) -> Result<V>;

    /// Inserts or fully replaces the entry for `key`, expiring `ttl` from now.
    ///
    /// The most recent call always wins, whether its expiry is earlier or
    /// later than the previous one.
    async fn set(&self, ctx: &Context, key: &str, value: V, ttl: Duration) -> Result<()>;

    /// Removes the entry for `key`. Absent or expired keys are not an error.
    async fn del(&self, ctx: &Context, key: &str) -> Result<()>;
}

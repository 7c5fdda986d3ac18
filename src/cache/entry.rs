//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored value paired with its absolute expiry.
///
/// An entry past its expiry is logically absent even while it still sits in
/// the map.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value, never inspected
    pub value: V,
    /// Expiry on the monotonic clock, None = beyond the representable horizon
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry expiring `ttl` from now.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self::new_at(value, ttl, Instant::now())
    }

    /// Creates an entry expiring `ttl` after `now`.
    pub fn new_at(value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: now.checked_add(ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to the expiration time, so a zero TTL is
    /// expired immediately.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks expiry against a caller-supplied instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}

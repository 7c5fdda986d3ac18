//! Cache Module
//!
//! The cache contract and its in-memory implementation with lazy TTL expiration.

mod context;
mod contract;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use context::Context;
pub use contract::Cache;
pub(crate) use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::LocalCache;

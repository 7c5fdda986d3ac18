//! TTL Cache - A process-local in-memory key/value cache
//!
//! Callers depend on the [`Cache`] contract; [`LocalCache`] backs it with a
//! mutex-guarded map and lazy per-entry TTL expiration.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, Context, LocalCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;

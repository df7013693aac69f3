//! Cache Module
//!
//! In-memory TTL store backing the proxy's negative cache.

mod entry;
mod store;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::CacheEntry;
pub use store::CacheStore;

// == Public Types ==
/// Store shared between request handlers and the sweep task.
pub type SharedCache<V = String> = Arc<RwLock<CacheStore<V>>>;

/// Creates an empty store ready to be shared.
pub fn shared<V>() -> SharedCache<V> {
    Arc::new(RwLock::new(CacheStore::new()))
}

// == Public Constants ==
/// Value recorded for keys confirmed absent from both buckets.
pub const NEGATIVE_MARKER: &str = "NoSuchKey";

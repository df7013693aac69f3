//! Cache Store Module
//!
//! HashMap storage with per-entry TTL. Reads never evict; expired entries are
//! only physically removed by [`CacheStore::cleanup_expired`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::cache::CacheEntry;

// == Cache Store ==
/// Key-value storage where every entry carries its own expiry instant.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    // == Set ==
    /// Stores a value that expires `ttl` from now.
    ///
    /// Overwrites any prior entry for the key and resets its expiry.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        self.entries.insert(key.into(), CacheEntry::new(value, ttl));
    }

    // == Get ==
    /// Returns the value for `key` if present and not yet expired.
    ///
    /// A stale entry is reported as missing but left in place for the sweep.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the number of entries physically held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! In-memory bucket, a test fixture.
//!
//! Not used by the server binary. Integration tests build a proxy over two of
//! these and inspect the call counters to check upstream traffic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use super::{Bucket, ObjectBody, StoredObject};
use crate::error::{Result, StorageError};

/// Fully buffered object held by a [`MemoryBucket`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryObject {
    pub body: Bytes,
    pub metadata: HashMap<String, String>,
}

impl MemoryObject {
    /// Creates an object without metadata.
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            metadata: HashMap::new(),
        }
    }

    /// Adds a metadata entry.
    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }
}

/// Test bucket backed by a mutex-guarded map, with call counters and a
/// switch that makes every call fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryBucket {
    name: String,
    objects: Arc<Mutex<HashMap<String, MemoryObject>>>,
    gets: Arc<AtomicUsize>,
    puts: Arc<AtomicUsize>,
    fail_requests: Arc<AtomicBool>,
}

impl MemoryBucket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Seeds an object without counting it as a put.
    pub fn insert(&self, key: impl Into<String>, object: MemoryObject) {
        self.lock().insert(key.into(), object);
    }

    /// Returns a copy of the object at `key`, without counting it as a get.
    pub fn object(&self, key: &str) -> Option<MemoryObject> {
        self.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Makes every subsequent call fail with a request error, as an outage would.
    pub fn set_failing(&self, failing: bool) {
        self.fail_requests.store(failing, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, MemoryObject>> {
        // A poisoned map only means a panicking test; the data is still usable.
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_available(&self) -> Result<()> {
        if self.fail_requests.load(Ordering::SeqCst) {
            return Err(StorageError::Request {
                bucket: self.name.clone(),
                message: "bucket unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Bucket for MemoryBucket {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_object(&self, key: &str) -> Result<StoredObject> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let object = self
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                bucket: self.name.clone(),
                key: key.to_string(),
            })?;

        Ok(StoredObject {
            body: ObjectBody::from_bytes(object.body),
            metadata: object.metadata,
        })
    }

    async fn put_object(&self, key: &str, body: Bytes) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        self.lock().insert(key.to_string(), MemoryObject::new(body));
        Ok(())
    }
}

//! Dual-Bucket Resolver
//!
//! Decides, for every request, whether a key is answered from the negative
//! cache, the target bucket or the source bucket.
//!
//! Lookups run strictly in order: cache, then target, then source. An object
//! found only in source is served immediately and copied into target by a
//! detached [`MigrationTask`]. A key missing from both buckets is remembered in
//! the negative cache for `cache_error_duration`.
//!
//! Every failed bucket lookup counts as a miss, whether the bucket reported the
//! key absent or the call itself failed. A transient outage of both buckets is
//! therefore remembered as an absence for the whole TTL window.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::cache::{self, SharedCache, NEGATIVE_MARKER};
use crate::models::{ObjectOrigin, ResolvedObject, Resolution};
use crate::storage::{Bucket, ObjectBody, StoredObject};
use crate::tasks::MigrationTask;

/// Resolution state machine over a source/target bucket pair.
pub struct Resolver {
    cache: SharedCache,
    source: Arc<dyn Bucket>,
    target: Arc<dyn Bucket>,
    cache_error_duration: Duration,
}

impl Resolver {
    /// Creates a resolver with its own empty negative cache.
    pub fn new(
        source: Arc<dyn Bucket>,
        target: Arc<dyn Bucket>,
        cache_error_duration: Duration,
    ) -> Self {
        Self {
            cache: cache::shared(),
            source,
            target,
            cache_error_duration,
        }
    }

    /// Handle to the negative cache, for the sweep task.
    pub fn cache(&self) -> SharedCache {
        Arc::clone(&self.cache)
    }

    pub fn source(&self) -> &dyn Bucket {
        self.source.as_ref()
    }

    pub fn target(&self) -> &dyn Bucket {
        self.target.as_ref()
    }

    /// Resolves `key` to a terminal state.
    ///
    /// Only the [`Resolution::Miss`] path writes to the cache.
    pub async fn resolve(&self, key: &str) -> Resolution {
        // The read guard is released before any bucket call
        let cached = self.cache.read().await.get(key);
        if cached.is_some() {
            debug!(object_key = %key, "Negative cache hit");
            return Resolution::CachedMiss;
        }

        match self.target.get_object(key).await {
            Ok(object) => {
                return Resolution::Found(ResolvedObject::new(key, object, ObjectOrigin::Target));
            }
            Err(err) => debug!(
                object_key = %key,
                bucket = %self.target.name(),
                error_kind = err.kind(),
                "Target lookup missed, trying source"
            ),
        }

        // The source body is read in full: the copy into target needs every byte
        let fetched = match self.source.get_object(key).await {
            Ok(object) => object
                .body
                .collect()
                .await
                .map(|body| (body, object.metadata)),
            Err(err) => Err(err),
        };

        match fetched {
            Ok((body, metadata)) => {
                MigrationTask::new(key, body.clone(), self.source.name(), Arc::clone(&self.target))
                    .spawn();

                let object = StoredObject {
                    body: ObjectBody::from_bytes(body),
                    metadata,
                };
                Resolution::Found(ResolvedObject::new(key, object, ObjectOrigin::Source))
            }
            Err(err) => {
                error!(
                    object_key = %key,
                    error_kind = err.kind(),
                    error = %err,
                    "Failed to fetch object"
                );

                self.cache.write().await.set(
                    key,
                    NEGATIVE_MARKER.to_string(),
                    self.cache_error_duration,
                );
                Resolution::Miss
            }
        }
    }
}

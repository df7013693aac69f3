//! Background Migration Task
//!
//! Copies an object served from the source bucket into the target bucket,
//! detached from the request that triggered it.

use std::sync::Arc;

use bytes::Bytes;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::storage::Bucket;

/// One copy of a fully buffered object into the target bucket.
///
/// A single attempt is made. Concurrent tasks for the same key are not
/// coordinated; each is an overwrite with identical bytes.
pub struct MigrationTask {
    key: String,
    body: Bytes,
    source_name: String,
    target: Arc<dyn Bucket>,
}

impl MigrationTask {
    pub fn new(
        key: impl Into<String>,
        body: Bytes,
        source_name: impl Into<String>,
        target: Arc<dyn Bucket>,
    ) -> Self {
        Self {
            key: key.into(),
            body,
            source_name: source_name.into(),
            target,
        }
    }

    /// Runs the copy on its own task. Nothing awaits the returned handle on
    /// the request path.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Performs the put and logs the outcome. Failures are never propagated.
    pub async fn run(self) {
        let result = self.target.put_object(&self.key, self.body).await;

        match result {
            Ok(()) => info!(
                object_key = %self.key,
                source = %self.source_name,
                target = %self.target.name(),
                "Object migrated from source to target"
            ),
            Err(err) => error!(
                object_key = %self.key,
                source = %self.source_name,
                target = %self.target.name(),
                error = %err,
                "Failed to copy object from source to target"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBucket;

    #[tokio::test]
    async fn test_migration_copies_bytes() {
        let target = MemoryBucket::new("fresh");
        let task = MigrationTask::new(
            "photos/a.jpg",
            Bytes::from_static(b"jpeg"),
            "legacy",
            Arc::new(target.clone()),
        );

        task.spawn().await.unwrap();

        assert_eq!(
            target.object("photos/a.jpg").unwrap().body,
            Bytes::from_static(b"jpeg")
        );
        assert_eq!(target.put_count(), 1);
    }

    #[tokio::test]
    async fn test_migration_failure_is_swallowed() {
        let target = MemoryBucket::new("fresh");
        target.set_failing(true);

        let task = MigrationTask::new(
            "k",
            Bytes::from_static(b"v"),
            "legacy",
            Arc::new(target.clone()),
        );

        // Completes without panicking; the task itself reports nothing
        task.spawn().await.unwrap();

        assert!(!target.contains("k"));
        assert_eq!(target.put_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_migrations_converge() {
        let target = MemoryBucket::new("fresh");
        let handles: Vec<_> = (0..4)
            .map(|_| {
                MigrationTask::new(
                    "k",
                    Bytes::from_static(b"same"),
                    "legacy",
                    Arc::new(target.clone()),
                )
                .spawn()
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(target.put_count(), 4);
        assert_eq!(target.object("k").unwrap().body, Bytes::from_static(b"same"));
    }
}

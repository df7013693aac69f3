//! Storage Module
//!
//! Bucket abstraction the resolver reads from and the migration task writes to.
//!
//! # Implementations
//! - [`S3Bucket`]: S3-compatible object storage through `aws-sdk-s3`
//! - [`MemoryBucket`]: in-process test fixture

mod memory;
mod s3;

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use crate::error::Result;

pub use memory::{MemoryBucket, MemoryObject};
pub use s3::S3Bucket;

/// Object body as a stream of chunks, read lazily from the bucket.
pub struct ObjectBody(BoxStream<'static, Result<Bytes>>);

impl ObjectBody {
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: futures::Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self(stream.boxed())
    }

    /// A body made of a single chunk.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::from_stream(stream::iter([Ok(bytes.into())]))
    }

    /// Reads the remaining chunks into one buffer.
    pub async fn collect(self) -> Result<Bytes> {
        self.0
            .try_fold(BytesMut::new(), |mut buffer, chunk| async move {
                buffer.extend_from_slice(&chunk);
                Ok(buffer)
            })
            .await
            .map(BytesMut::freeze)
    }

    pub fn into_stream(self) -> BoxStream<'static, Result<Bytes>> {
        self.0
    }
}

impl fmt::Debug for ObjectBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ObjectBody(..)")
    }
}

/// An object as returned by a bucket lookup.
#[derive(Debug)]
pub struct StoredObject {
    /// Object body, not yet read
    pub body: ObjectBody,
    /// User metadata, header name to value
    pub metadata: HashMap<String, String>,
}

/// One bucket of an object store.
#[async_trait]
pub trait Bucket: Send + Sync {
    /// Bucket identity, used in log records.
    fn name(&self) -> &str;

    /// Open the object stored at `key`. The body is streamed, not buffered.
    async fn get_object(&self, key: &str) -> Result<StoredObject>;

    /// Store `body` at `key`, overwriting any existing object.
    async fn put_object(&self, key: &str, body: Bytes) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;

    #[tokio::test]
    async fn test_collect_joins_chunks() {
        let body = ObjectBody::from_stream(stream::iter([
            Ok(Bytes::from_static(b"hello ")),
            Ok(Bytes::from_static(b"world")),
        ]));

        assert_eq!(body.collect().await.unwrap(), Bytes::from_static(b"hello world"));
    }

    #[tokio::test]
    async fn test_collect_surfaces_body_error() {
        let body = ObjectBody::from_stream(stream::iter([
            Ok(Bytes::from_static(b"partial")),
            Err(StorageError::Body {
                bucket: "old".to_string(),
                key: "k".to_string(),
                message: "connection reset".to_string(),
            }),
        ]));

        let err = body.collect().await.unwrap_err();
        assert_eq!(err.kind(), "body");
    }

    #[tokio::test]
    async fn test_from_bytes_is_single_chunk() {
        let chunks: Vec<Bytes> = ObjectBody::from_bytes("abc")
            .into_stream()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(chunks, vec![Bytes::from_static(b"abc")]);
    }
}

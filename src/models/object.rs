//! Resolved object types
//!
//! Values produced by a successful bucket lookup for a single request.

use std::collections::HashMap;
use std::fmt;

use crate::storage::{ObjectBody, StoredObject};

/// Which bucket served a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectOrigin {
    Target,
    Source,
}

impl ObjectOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectOrigin::Target => "target",
            ObjectOrigin::Source => "source",
        }
    }
}

impl fmt::Display for ObjectOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An object found in one of the two buckets.
#[derive(Debug)]
pub struct ResolvedObject {
    /// Object key
    pub key: String,
    /// Object body, streamed to the client
    pub body: ObjectBody,
    /// User metadata copied into response headers
    pub metadata: HashMap<String, String>,
    /// Bucket the object was read from
    pub origin: ObjectOrigin,
}

impl ResolvedObject {
    pub fn new(key: impl Into<String>, object: StoredObject, origin: ObjectOrigin) -> Self {
        Self {
            key: key.into(),
            body: object.body,
            metadata: object.metadata,
            origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_labels() {
        assert_eq!(ObjectOrigin::Target.to_string(), "target");
        assert_eq!(ObjectOrigin::Source.as_str(), "source");
    }

    #[tokio::test]
    async fn test_resolved_object_from_stored() {
        let stored = StoredObject {
            body: ObjectBody::from_bytes("bytes"),
            metadata: HashMap::from([("x-owner".to_string(), "ops".to_string())]),
        };
        let resolved = ResolvedObject::new("a/b", stored, ObjectOrigin::Source);

        assert_eq!(resolved.key, "a/b");
        assert_eq!(resolved.metadata["x-owner"], "ops");
        assert_eq!(resolved.origin, ObjectOrigin::Source);
        assert_eq!(resolved.body.collect().await.unwrap(), "bytes");
    }
}

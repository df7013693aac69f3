//! S3-compatible bucket backed by `aws-sdk-s3`.

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::SharedCredentialsProvider;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, Config};
use aws_types::region::Region;
use bytes::Bytes;
use futures::stream::{self, TryStreamExt};
use tracing::debug;

use super::{Bucket, ObjectBody, StoredObject};
use crate::config::S3Config;
use crate::error::{Result, StorageError};

/// A single bucket on an S3-compatible service.
#[derive(Debug, Clone)]
pub struct S3Bucket {
    client: Client,
    bucket: String,
}

impl S3Bucket {
    /// Builds a client with static credentials for the configured bucket.
    pub fn new(config: &S3Config) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,     // session token
            None,     // expiry time
            "static", // provider name
        );

        let mut builder = Config::builder()
            .credentials_provider(SharedCredentialsProvider::new(credentials))
            .region(Region::new(config.region.clone()))
            .behavior_version_latest();

        if let Some(url) = config.endpoint_url() {
            debug!(bucket = %config.bucket_name, endpoint = %url, "Using custom S3 endpoint");
            // Custom endpoints are usually MinIO-like and need path-style addressing
            builder = builder.endpoint_url(url).force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket_name.clone(),
        }
    }
}

#[async_trait]
impl Bucket for S3Bucket {
    fn name(&self) -> &str {
        &self.bucket
    }

    async fn get_object(&self, key: &str) -> Result<StoredObject> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let no_such_key = err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false);
                if no_such_key {
                    StorageError::NotFound {
                        bucket: self.bucket.clone(),
                        key: key.to_string(),
                    }
                } else {
                    StorageError::Request {
                        bucket: self.bucket.clone(),
                        message: DisplayErrorContext(&err).to_string(),
                    }
                }
            })?;

        let metadata = output.metadata().cloned().unwrap_or_default();

        // Chunks are pulled from the connection only as the caller reads them
        let bucket = self.bucket.clone();
        let object_key = key.to_string();
        let chunks = stream::unfold(output.body, |mut body| async move {
            body.next().await.map(|chunk| (chunk, body))
        })
        .map_err(move |err| StorageError::Body {
            bucket: bucket.clone(),
            key: object_key.clone(),
            message: err.to_string(),
        });
        let body = ObjectBody::from_stream(chunks);

        Ok(StoredObject { body, metadata })
    }

    async fn put_object(&self, key: &str, body: Bytes) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|err| StorageError::Request {
                bucket: self.bucket.clone(),
                message: DisplayErrorContext(&err).to_string(),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(endpoint: &str) -> S3Config {
        S3Config {
            bucket_name: "legacy-assets".to_string(),
            region: "eu-west-1".to_string(),
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
            endpoint: endpoint.to_string(),
            protocol: "http".to_string(),
        }
    }

    #[tokio::test]
    async fn test_s3_bucket_name() {
        let bucket = S3Bucket::new(&test_config("localhost:9000"));
        assert_eq!(bucket.name(), "legacy-assets");
    }

    #[tokio::test]
    async fn test_s3_bucket_default_endpoint() {
        let bucket = S3Bucket::new(&test_config(""));
        assert_eq!(bucket.name(), "legacy-assets");
    }
}

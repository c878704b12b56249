//! S3-compatible object storage adapter.
//!
//! Backed by the official `aws-sdk-s3` crate. Setting `endpoint_url` in
//! config points the adapter at Cloudflare R2, MinIO or any other
//! S3-compatible service.
//!
//! # Authentication
//!
//! Credentials are resolved in the standard AWS order: environment
//! variables → shared credentials file → instance profile. For R2 or
//! MinIO set `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY` in the
//! environment.

use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Builder as S3Builder;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use thiserror::Error;

use crate::config::StorageConfig;

/// Object storage failure, with the failed operation and key in the text.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StorageError(String);

/// Thin client wrapper bound to one bucket.
#[derive(Clone)]
pub struct ObjectStorage {
    client: Client,
    bucket: String,
}

impl ObjectStorage {
    /// Build the store from config, loading AWS credentials from the
    /// environment using the standard SDK credential chain.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let region = aws_sdk_s3::config::Region::new(config.region.clone());

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let mut builder = S3Builder::from(&sdk_config);

        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        }
    }

    /// Store an object privately, marked uncacheable.
    pub async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<(), StorageError> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .acl(ObjectCannedAcl::Private)
            .cache_control("no-store")
            .body(ByteStream::from(data));

        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }

        request
            .send()
            .await
            .map_err(|e| StorageError(format!("put failed for key '{key}': {e}")))?;
        Ok(())
    }

    /// Presign a time-limited GET URL for a stored object.
    pub async fn presign_get(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError(format!("invalid presign expiry: {e}")))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError(format!("presign failed for key '{key}': {e}")))?;

        Ok(presigned.uri().to_string())
    }
}

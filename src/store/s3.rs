//! Amazon S3 (or any S3-compatible endpoint) via `object_store::aws`.
//!
//! Credentials, region and endpoint come from the usual `AWS_*` variables
//! (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_DEFAULT_REGION`,
//! `AWS_ENDPOINT`, `AWS_ALLOW_HTTP`, ...), optionally loaded from `.env`.

use std::path::Path;

use object_store::aws::{AmazonS3, AmazonS3Builder, S3ConditionalPut};

use crate::error::AppError;
use crate::store::ObjectStore;
use crate::store::blocking::{BlockingClient, object_location, validate_bucket};

#[derive(Debug)]
pub struct S3ObjectStore {
    builder: AmazonS3Builder,
    client: BlockingClient,
}

impl S3ObjectStore {
    /// Use a pre-configured builder; the bucket is filled in per request.
    pub fn new(builder: AmazonS3Builder) -> Result<Self, AppError> {
        Ok(Self {
            // `If-None-Match: *` is how a no-overwrite upload is expressed.
            builder: builder.with_conditional_put(S3ConditionalPut::ETagMatch),
            client: BlockingClient::new()?,
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::new(AmazonS3Builder::from_env())
    }

    fn bucket(&self, bucket: &str) -> Result<AmazonS3, AppError> {
        validate_bucket(bucket)?;
        self.builder
            .clone()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| AppError::input(format!("Invalid S3 configuration for bucket '{bucket}': {e}")))
    }
}

impl ObjectStore for S3ObjectStore {
    fn put_file(&self, bucket: &str, key: &str, local_path: &Path, overwrite: bool) -> Result<(), AppError> {
        let store = self.bucket(bucket)?;
        let location = object_location(None, key)?;
        self.client.put_file(&store, &location, local_path, overwrite)
    }

    fn exists(&self, bucket: &str, key: &str) -> Result<bool, AppError> {
        let store = self.bucket(bucket)?;
        let location = object_location(None, key)?;
        self.client.exists(&store, &location)
    }
}

//! Synchronous calls into the async `object_store` crate.
//!
//! Each adapter owns a small current-thread tokio runtime and blocks on one
//! request at a time; nothing here is shared across threads.

use std::fs;
use std::path::Path;

use object_store::path::Path as ObjectPath;
use object_store::{DynObjectStore, ObjectStore as _, PutMode, PutOptions, PutPayload};
use tokio::runtime::{Builder, Runtime};

use crate::error::AppError;

#[derive(Debug)]
pub(crate) struct BlockingClient {
    runtime: Runtime,
}

impl BlockingClient {
    pub(crate) fn new() -> Result<Self, AppError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AppError::input(format!("Failed to start object store runtime: {e}")))?;
        Ok(Self { runtime })
    }

    /// Upload a local file. `overwrite == false` maps to a conditional create.
    pub(crate) fn put_file(
        &self,
        store: &DynObjectStore,
        location: &ObjectPath,
        local_path: &Path,
        overwrite: bool,
    ) -> Result<(), AppError> {
        let bytes = fs::read(local_path)
            .map_err(|e| AppError::input(format!("Failed to read '{}': {e}", local_path.display())))?;

        let opts = PutOptions {
            mode: if overwrite { PutMode::Overwrite } else { PutMode::Create },
            ..Default::default()
        };

        match self
            .runtime
            .block_on(store.put_opts(location, PutPayload::from(bytes), opts))
        {
            Ok(_) => Ok(()),
            Err(object_store::Error::AlreadyExists { .. }) => Err(AppError::input(format!(
                "Object {location} already exists and overwrite is disabled."
            ))),
            Err(e) => Err(AppError::service(format!("Upload of {location} failed: {e}"))),
        }
    }

    pub(crate) fn exists(&self, store: &DynObjectStore, location: &ObjectPath) -> Result<bool, AppError> {
        match self.runtime.block_on(store.head(location)) {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(AppError::service(format!("Lookup of {location} failed: {e}"))),
        }
    }
}

/// Check a slash-separated object key: relative, no empty, `.` or `..` segments.
pub(crate) fn validate_key(key: &str) -> Result<(), AppError> {
    let ok = key
        .split('/')
        .all(|seg| !seg.is_empty() && seg != "." && seg != "..");
    if !ok {
        return Err(AppError::input(format!(
            "Invalid object key '{key}': must be relative with no empty, `.` or `..` segments."
        )));
    }
    Ok(())
}

pub(crate) fn validate_bucket(bucket: &str) -> Result<(), AppError> {
    if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == "." || bucket == ".." {
        return Err(AppError::input(format!("Invalid bucket name '{bucket}'.")));
    }
    Ok(())
}

/// Object location for an already validated key, optionally nested under a prefix.
pub(crate) fn object_location(prefix: Option<&str>, key: &str) -> Result<ObjectPath, AppError> {
    validate_key(key)?;
    let joined = match prefix {
        Some(prefix) => format!("{prefix}/{key}"),
        None => key.to_string(),
    };
    ObjectPath::parse(&joined).map_err(|e| AppError::input(format!("Invalid object key '{key}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_validated() {
        for key in ["../etc/passwd", "/abs", "a/./b", "", "dir/", "a//b"] {
            assert!(validate_key(key).is_err(), "accepted key {key:?}");
        }
        assert!(validate_key("2024/01/weekly.csv").is_ok());
    }

    #[test]
    fn buckets_are_validated() {
        for bucket in ["", "..", "a/b"] {
            assert!(validate_bucket(bucket).is_err(), "accepted bucket {bucket:?}");
        }
        assert!(validate_bucket("raw-data").is_ok());
    }

    #[test]
    fn location_joins_prefix() {
        let loc = object_location(Some("landing"), "weekly/data.csv").unwrap();
        assert_eq!(loc.as_ref(), "landing/weekly/data.csv");
        assert_eq!(object_location(None, "k").unwrap().as_ref(), "k");
    }
}

//! Object store transfer.
//!
//! `ObjectStore` is the seam to whatever bucket service the pipeline targets;
//! `upload_file` layers the "upload, then optionally drop the local copy"
//! contract on top of it. A failed upload never touches the local file, and a
//! failed local removal is reported on the `TransferReport` instead of failing
//! an upload that already succeeded.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};

use crate::domain::{LocalCleanup, TransferReport, TransferRequest};
use crate::error::AppError;

mod blocking;
pub mod local;
pub mod s3;

pub use local::LocalObjectStore;
pub use s3::S3ObjectStore;

/// A bucket/key addressed blob store.
pub trait ObjectStore {
    /// Upload `local_path` to `bucket/key`.
    ///
    /// With `overwrite == false` an existing object is an error.
    fn put_file(&self, bucket: &str, key: &str, local_path: &Path, overwrite: bool) -> Result<(), AppError>;

    fn exists(&self, bucket: &str, key: &str) -> Result<bool, AppError>;
}

/// Upload one local file and, if requested, remove it afterwards.
pub fn upload_file<S>(store: &S, request: &TransferRequest) -> Result<TransferReport, AppError>
where
    S: ObjectStore + ?Sized,
{
    let path = &request.local_path;
    let bytes = fs::metadata(path)
        .map_err(|e| AppError::input(format!("Failed to stat '{}': {e}", path.display())))?
        .len();

    store.put_file(&request.bucket, &request.key, path, request.overwrite)?;
    info!(
        bucket = %request.bucket,
        key = %request.key,
        bytes,
        "uploaded {}",
        path.display()
    );

    let local = if request.remove_local {
        remove_local_copy(path)
    } else {
        LocalCleanup::Kept
    };

    Ok(TransferReport {
        bucket: request.bucket.clone(),
        key: request.key.clone(),
        bytes,
        local,
    })
}

fn remove_local_copy(path: &Path) -> LocalCleanup {
    match fs::remove_file(path) {
        Ok(()) => LocalCleanup::Removed,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("local file '{}' was already gone after upload", path.display());
            LocalCleanup::AlreadyAbsent
        }
        Err(e) => {
            warn!("failed to remove local file '{}' after upload: {e}", path.display());
            LocalCleanup::Failed(e.to_string())
        }
    }
}

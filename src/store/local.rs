//! Filesystem-backed object store: `<root>/<bucket>/<key>`.

use std::fs;
use std::path::{Path, PathBuf};

use object_store::local::LocalFileSystem;

use crate::error::AppError;
use crate::store::ObjectStore;
use crate::store::blocking::{BlockingClient, object_location, validate_bucket};

#[derive(Debug)]
pub struct LocalObjectStore {
    root: PathBuf,
    inner: LocalFileSystem,
    client: BlockingClient,
}

impl LocalObjectStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| AppError::input(format!("Failed to create store root '{}': {e}", root.display())))?;
        let inner = LocalFileSystem::new_with_prefix(&root).map_err(|e| {
            AppError::input(format!("Failed to open local store '{}': {e}", root.display()))
        })?;
        Ok(Self {
            root,
            inner,
            client: BlockingClient::new()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path an object is stored at.
    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, AppError> {
        validate_bucket(bucket)?;
        let location = object_location(Some(bucket), key)?;
        self.inner
            .path_to_filesystem(&location)
            .map_err(|e| AppError::input(format!("Invalid object location {location}: {e}")))
    }
}

impl ObjectStore for LocalObjectStore {
    fn put_file(&self, bucket: &str, key: &str, local_path: &Path, overwrite: bool) -> Result<(), AppError> {
        validate_bucket(bucket)?;
        let location = object_location(Some(bucket), key)?;
        self.client.put_file(&self.inner, &location, local_path, overwrite)
    }

    fn exists(&self, bucket: &str, key: &str) -> Result<bool, AppError> {
        validate_bucket(bucket)?;
        let location = object_location(Some(bucket), key)?;
        self.client.exists(&self.inner, &location)
    }
}

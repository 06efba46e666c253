//! Local filesystem content store
//!
//! Every object is a flat file directly under the storage root, named by
//! `generate_stored_name`. Partial uploads are removed on failure and when
//! the upload future is dropped mid-stream.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::StorageConfig;
use crate::modules::storage::content_store::{
    ByteStream, ContentStore, StorageError, StoredObject, UploadStream,
};
use crate::shared::validation::{EXTENSION_REGEX, STORED_NAME_REGEX};

/// Attempts at finding an unused name before giving up
const MAX_NAME_ATTEMPTS: usize = 3;

#[derive(Debug, Clone)]
pub struct LocalContentStore {
    root: PathBuf,
    max_file_size: u64,
}

impl LocalContentStore {
    /// Create the store, creating the root directory if needed
    pub async fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.root).await?;

        info!(
            "Local content store ready at {} (max file size: {} bytes)",
            config.root.display(),
            config.max_file_size
        );

        Ok(Self {
            root: config.root.clone(),
            max_file_size: config.max_file_size,
        })
    }

    /// Resolve a stored name to its path. Names this store could not have
    /// generated resolve to nothing.
    fn resolve(&self, stored_name: &str) -> Result<PathBuf, StorageError> {
        if !STORED_NAME_REGEX.is_match(stored_name) {
            return Err(StorageError::NotFound(stored_name.to_string()));
        }
        Ok(self.root.join(stored_name))
    }

    /// Create a new, empty file under a fresh name
    async fn create_unique(
        &self,
        original_name: &str,
    ) -> Result<(String, PathBuf, fs::File), StorageError> {
        let mut last_err = None;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let stored_name = generate_stored_name(original_name);
            let path = self.root.join(&stored_name);

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((stored_name, path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    warn!("Stored name collision on {}, regenerating", stored_name);
                    last_err = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StorageError::Io(last_err.unwrap_or_else(|| {
            std::io::Error::new(ErrorKind::AlreadyExists, "no unused stored name found")
        })))
    }

    async fn write_body(
        &self,
        file: fs::File,
        mut body: UploadStream<'_>,
    ) -> Result<u64, StorageError> {
        let mut writer = BufWriter::new(file);
        let mut written: u64 = 0;

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| StorageError::Interrupted(e.to_string()))?;

            written += chunk.len() as u64;
            if written > self.max_file_size {
                return Err(StorageError::CapacityExceeded {
                    limit: self.max_file_size,
                });
            }

            writer.write_all(&chunk).await?;
        }

        writer.flush().await?;
        writer.into_inner().sync_all().await?;

        Ok(written)
    }
}

#[async_trait]
impl ContentStore for LocalContentStore {
    async fn put(
        &self,
        original_name: &str,
        body: UploadStream<'_>,
    ) -> Result<StoredObject, StorageError> {
        let (stored_name, path, file) = self.create_unique(original_name).await?;
        let guard = PartialFile::new(path.clone());

        match self.write_body(file, body).await {
            Ok(size_bytes) => {
                guard.keep();
                debug!("Stored {} ({} bytes)", stored_name, size_bytes);
                Ok(StoredObject {
                    stored_name,
                    size_bytes,
                })
            }
            Err(e) => {
                guard.keep();
                if let Err(rm) = fs::remove_file(&path).await {
                    warn!(
                        target: "reconcile",
                        stored_name = %stored_name,
                        "Failed to remove partial upload: {}", rm
                    );
                } else {
                    debug!("Removed partial upload {} after error: {}", stored_name, e);
                }
                Err(e)
            }
        }
    }

    async fn open_read(&self, stored_name: &str) -> Result<ByteStream, StorageError> {
        let path = self.resolve(stored_name)?;

        // Open directly and classify the failure; no separate existence check
        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(stored_name.to_string())
            } else {
                StorageError::Io(e)
            }
        })?;

        Ok(ReaderStream::new(file).boxed())
    }

    async fn remove(&self, stored_name: &str) -> Result<(), StorageError> {
        let path = self.resolve(stored_name)?;

        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(stored_name.to_string())
            } else {
                StorageError::Io(e)
            }
        })?;

        debug!("Removed {}", stored_name);
        Ok(())
    }
}

/// Removes a partially written file if the upload never completes,
/// including when the upload future is dropped.
struct PartialFile {
    path: Option<PathBuf>,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Hand responsibility for the file back to the caller
    fn keep(mut self) {
        self.path = None;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            // Drop can't await; a single blocking unlink is acceptable here
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed abandoned upload {}", path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(
                    target: "reconcile",
                    path = %path.display(),
                    "Failed to remove abandoned upload: {}", e
                ),
            }
        }
    }
}

/// Build a collision-resistant stored name: a UUID v7 (millisecond clock plus
/// random bits) and, when it is safe, the original file's extension.
pub fn generate_stored_name(original_name: &str) -> String {
    let id = Uuid::now_v7().simple();
    match safe_extension(original_name) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

fn safe_extension(original_name: &str) -> Option<String> {
    let (stem, ext) = original_name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    let ext = ext.to_ascii_lowercase();
    EXTENSION_REGEX.is_match(&ext).then_some(ext)
}

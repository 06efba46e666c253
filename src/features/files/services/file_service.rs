use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::catalog::FileCatalog;
use crate::features::files::dtos::{FileSummaryDto, DEFAULT_MIME_TYPE};
use crate::features::files::models::{FileRecord, NewFileRecord};
use crate::modules::storage::{ByteStream, ContentStore, StorageError, UploadStream};

/// File content ready to be relayed to the owner
pub struct FileDownload {
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub body: ByteStream,
}

/// Service for file operations
///
/// Keeps the catalog and the content store in step: bytes are written before
/// their record is inserted and removed before their record is deleted, so a
/// committed record never points at bytes that were never written.
pub struct FileService {
    content: Arc<dyn ContentStore>,
    catalog: Arc<dyn FileCatalog>,
}

impl FileService {
    pub fn new(content: Arc<dyn ContentStore>, catalog: Arc<dyn FileCatalog>) -> Self {
        Self { content, catalog }
    }

    /// Store an uploaded file for `owner_id`
    ///
    /// # Arguments
    /// * `owner_id` - The verified caller
    /// * `original_name` - Display name supplied by the client
    /// * `mime_type` - Content type supplied by the client
    /// * `body` - The file content, consumed as it arrives
    ///
    /// # Returns
    /// The committed file record
    pub async fn upload(
        &self,
        owner_id: Uuid,
        original_name: &str,
        mime_type: &str,
        body: UploadStream<'_>,
    ) -> Result<FileRecord> {
        let original_name = original_name.trim();
        if original_name.is_empty() {
            return Err(AppError::Validation("Filename is required".to_string()));
        }

        let mime_type = match mime_type.trim() {
            "" => DEFAULT_MIME_TYPE,
            m => m,
        };

        let stored = self.content.put(original_name, body).await?;
        debug!(
            "Content stored: stored_name={}, size={}",
            stored.stored_name, stored.size_bytes
        );

        let record = NewFileRecord {
            stored_name: stored.stored_name.clone(),
            original_name: original_name.to_string(),
            size_bytes: i64::try_from(stored.size_bytes)
                .map_err(|_| AppError::Internal("File size out of range".to_string()))?,
            mime_type: mime_type.to_string(),
            uploaded_at: Utc::now(),
            owner_id,
        };

        match self.catalog.insert(record).await {
            Ok(file) => {
                info!(
                    "File uploaded: id={}, owner={}, size={}",
                    file.id, file.owner_id, file.size_bytes
                );
                Ok(file)
            }
            Err(e) => {
                self.roll_back_content(&stored.stored_name).await;
                Err(e)
            }
        }
    }

    /// List the caller's files, most recent first
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<FileSummaryDto>> {
        let files = self.catalog.find_by_owner(owner_id).await?;
        Ok(files.into_iter().map(FileSummaryDto::from).collect())
    }

    /// Open one of the caller's files for download
    pub async fn download(&self, owner_id: Uuid, file_id: Uuid) -> Result<FileDownload> {
        let file = self.find_owned(owner_id, file_id).await?;

        let body = match self.content.open_read(&file.stored_name).await {
            Ok(body) => body,
            Err(StorageError::NotFound(_)) => {
                warn!(
                    target: "reconcile",
                    file_id = %file.id,
                    stored_name = %file.stored_name,
                    "File record has no content"
                );
                return Err(not_found());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(FileDownload {
            original_name: file.original_name,
            mime_type: file.mime_type,
            size_bytes: file.size_bytes,
            body,
        })
    }

    /// Delete one of the caller's files
    ///
    /// Content that is already gone does not block removing the record.
    pub async fn delete(&self, owner_id: Uuid, file_id: Uuid) -> Result<()> {
        let file = self.find_owned(owner_id, file_id).await?;

        match self.content.remove(&file.stored_name).await {
            Ok(()) => {}
            Err(StorageError::NotFound(_)) => {
                warn!(
                    target: "reconcile",
                    file_id = %file.id,
                    stored_name = %file.stored_name,
                    "Content already missing while deleting file"
                );
            }
            Err(e) => return Err(e.into()),
        }

        self.catalog.delete_by_id(file.id).await?;

        info!("File deleted: id={}, owner={}", file.id, owner_id);
        Ok(())
    }

    /// Look up a file owned by `owner_id`. Files of other owners are
    /// reported exactly like files that do not exist.
    async fn find_owned(&self, owner_id: Uuid, file_id: Uuid) -> Result<FileRecord> {
        match self.catalog.find_by_id(file_id).await? {
            Some(file) if file.owner_id == owner_id => Ok(file),
            Some(_) => {
                debug!("File {} requested by non-owner {}", file_id, owner_id);
                Err(not_found())
            }
            None => Err(not_found()),
        }
    }

    async fn roll_back_content(&self, stored_name: &str) {
        match self.content.remove(stored_name).await {
            Ok(()) | Err(StorageError::NotFound(_)) => {
                debug!("Rolled back content {} after catalog failure", stored_name);
            }
            Err(e) => {
                error!(
                    target: "reconcile",
                    stored_name = %stored_name,
                    "Orphaned content after failed upload: {}", e
                );
            }
        }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("File not found".to_string())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::files::models::FileRecord;

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler streams axum's Multipart field directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// File as seen by its owner.
///
/// Storage location, owner and share settings are deliberately absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileSummaryDto {
    /// Unique identifier for the file
    pub id: Uuid,
    /// Filename as supplied at upload
    pub original_name: String,
    /// Size of the file in bytes
    pub size_bytes: i64,
    /// MIME type recorded at upload
    pub mime_type: String,
    /// Timestamp when the file was uploaded
    pub uploaded_at: DateTime<Utc>,
}

impl From<FileRecord> for FileSummaryDto {
    fn from(file: FileRecord) -> Self {
        Self {
            id: file.id,
            original_name: file.original_name,
            size_bytes: file.size_bytes,
            mime_type: file.mime_type,
            uploaded_at: file.uploaded_at,
        }
    }
}

/// Response DTO for delete operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponseDto {
    /// Confirmation that the file was deleted
    pub deleted: bool,
}

/// Content type used when the client does not declare one
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Slack on top of the file size cap for multipart framing
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;

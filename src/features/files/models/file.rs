use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Persisted metadata for one stored file
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FileRecord {
    pub id: Uuid,
    /// Key of the bytes in the content store
    pub stored_name: String,
    pub original_name: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub owner_id: Uuid,
    // Reserved for link sharing; no operation writes these yet
    pub share_link: Option<String>,
    pub share_expiry: Option<DateTime<Utc>>,
    pub share_password: Option<String>,
}

/// A file record before the catalog assigns its id
#[derive(Debug, Clone, Validate)]
pub struct NewFileRecord {
    #[validate(length(min = 1, message = "stored_name is required"))]
    pub stored_name: String,
    #[validate(length(min = 1, message = "original_name is required"))]
    pub original_name: String,
    #[validate(range(min = 0, message = "size_bytes must not be negative"))]
    pub size_bytes: i64,
    #[validate(length(min = 1, message = "mime_type is required"))]
    pub mime_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub owner_id: Uuid,
}

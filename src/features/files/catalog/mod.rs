//! Metadata catalog for file records
//!
//! The catalog validates and persists records; it knows nothing about
//! ownership rules or the content store. Those belong to `FileService`.

mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::files::models::{FileRecord, NewFileRecord};

pub use postgres::PgFileCatalog;

#[async_trait]
pub trait FileCatalog: Send + Sync {
    /// Persist a record and return it with its assigned id.
    /// Fails with `AppError::Validation` for malformed records.
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>>;

    /// All records of one owner, most recently uploaded first
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<FileRecord>>;

    /// Remove a record. Removing an absent id is not an error.
    async fn delete_by_id(&self, id: Uuid) -> Result<()>;
}

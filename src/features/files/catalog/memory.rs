//! In-memory catalog used by service and handler tests

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::files::catalog::FileCatalog;
use crate::features::files::models::{FileRecord, NewFileRecord};

#[derive(Default)]
pub struct InMemoryFileCatalog {
    files: RwLock<HashMap<Uuid, FileRecord>>,
}

impl InMemoryFileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }
}

#[async_trait]
impl FileCatalog for InMemoryFileCatalog {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord> {
        record
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let file = FileRecord {
            id: Uuid::new_v4(),
            stored_name: record.stored_name,
            original_name: record.original_name,
            size_bytes: record.size_bytes,
            mime_type: record.mime_type,
            uploaded_at: record.uploaded_at,
            owner_id: record.owner_id,
            share_link: None,
            share_expiry: None,
            share_password: None,
        };

        self.files.write().await.insert(file.id, file.clone());
        Ok(file)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>> {
        Ok(self.files.read().await.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<FileRecord>> {
        let mut files: Vec<FileRecord> = self
            .files
            .read()
            .await
            .values()
            .filter(|f| f.owner_id == owner_id)
            .cloned()
            .collect();

        files.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(files)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<()> {
        self.files.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn new_record(owner_id: Uuid, name: &str, minutes_ago: i64) -> NewFileRecord {
        NewFileRecord {
            stored_name: format!("{}.bin", Uuid::now_v7().simple()),
            original_name: name.to_string(),
            size_bytes: 42,
            mime_type: "application/octet-stream".to_string(),
            uploaded_at: Utc::now() - Duration::minutes(minutes_ago),
            owner_id,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_malformed_records() {
        let catalog = InMemoryFileCatalog::new();
        let owner = Uuid::new_v4();

        let mut empty_name = new_record(owner, "a.txt", 0);
        empty_name.original_name = String::new();
        assert!(matches!(
            catalog.insert(empty_name).await,
            Err(AppError::Validation(_))
        ));

        let mut negative = new_record(owner, "a.txt", 0);
        negative.size_bytes = -1;
        assert!(matches!(
            catalog.insert(negative).await,
            Err(AppError::Validation(_))
        ));

        assert_eq!(catalog.len().await, 0);
    }

    #[tokio::test]
    async fn test_find_by_owner_is_scoped_and_newest_first() {
        let catalog = InMemoryFileCatalog::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        catalog.insert(new_record(alice, "old.txt", 30)).await.unwrap();
        catalog.insert(new_record(alice, "new.txt", 1)).await.unwrap();
        catalog.insert(new_record(alice, "mid.txt", 10)).await.unwrap();
        catalog.insert(new_record(bob, "bob.txt", 0)).await.unwrap();

        let names: Vec<String> = catalog
            .find_by_owner(alice)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.original_name)
            .collect();

        assert_eq!(names, vec!["new.txt", "mid.txt", "old.txt"]);
    }

    #[tokio::test]
    async fn test_delete_absent_id_is_ok() {
        let catalog = InMemoryFileCatalog::new();
        assert!(catalog.delete_by_id(Uuid::new_v4()).await.is_ok());
    }
}

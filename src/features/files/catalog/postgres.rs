use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::files::catalog::FileCatalog;
use crate::features::files::models::{FileRecord, NewFileRecord};

const FILE_COLUMNS: &str = "id, stored_name, original_name, size_bytes, mime_type, uploaded_at, \
     owner_id, share_link, share_expiry, share_password";

/// File catalog backed by the `files` table
pub struct PgFileCatalog {
    pool: PgPool,
}

impl PgFileCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileCatalog for PgFileCatalog {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord> {
        record
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let query = format!(
            r#"
            INSERT INTO files (stored_name, original_name, size_bytes, mime_type, uploaded_at, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            FILE_COLUMNS
        );

        let file = sqlx::query_as::<_, FileRecord>(&query)
            .bind(&record.stored_name)
            .bind(&record.original_name)
            .bind(record.size_bytes)
            .bind(&record.mime_type)
            .bind(record.uploaded_at)
            .bind(record.owner_id)
            .fetch_one(&self.pool)
            .await?;

        debug!("File record inserted: id={}", file.id);
        Ok(file)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>> {
        let query = format!("SELECT {} FROM files WHERE id = $1", FILE_COLUMNS);

        let file = sqlx::query_as::<_, FileRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(file)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<FileRecord>> {
        let query = format!(
            r#"
            SELECT {}
            FROM files
            WHERE owner_id = $1
            ORDER BY uploaded_at DESC, id DESC
            "#,
            FILE_COLUMNS
        );

        let files = sqlx::query_as::<_, FileRecord>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(files)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(
            "File record delete: id={}, rows_affected={}",
            id,
            result.rows_affected()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};

    async fn create_owner(pool: &PgPool, username: &str) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (username, password_hash) VALUES ($1, 'x') RETURNING id",
        )
        .bind(username)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn record(owner_id: Uuid, name: &str, uploaded_at: DateTime<Utc>) -> NewFileRecord {
        NewFileRecord {
            stored_name: format!("{}.txt", Uuid::now_v7().simple()),
            original_name: name.to_string(),
            size_bytes: 3,
            mime_type: "text/plain".to_string(),
            uploaded_at,
            owner_id,
        }
    }

    async fn count_files(pool: &PgPool) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM files")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_insert_assigns_id_and_round_trips(pool: PgPool) {
        let catalog = PgFileCatalog::new(pool.clone());
        let owner = create_owner(&pool, "alice").await;

        let inserted = catalog
            .insert(record(owner, "report.pdf", Utc::now()))
            .await
            .unwrap();
        let found = catalog.find_by_id(inserted.id).await.unwrap().unwrap();

        assert_eq!(found.id, inserted.id);
        assert_eq!(found.original_name, "report.pdf");
        assert_eq!(found.owner_id, owner);
        assert_eq!(found.share_link, None);
        assert!(catalog.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_find_by_owner_orders_newest_first_with_id_tiebreak(pool: PgPool) {
        let catalog = PgFileCatalog::new(pool.clone());
        let alice = create_owner(&pool, "alice").await;
        let bob = create_owner(&pool, "bob").await;

        let now = Utc::now();
        let older = catalog
            .insert(record(alice, "older.txt", now - Duration::hours(1)))
            .await
            .unwrap();
        let mut tied = Vec::new();
        for name in ["a.txt", "b.txt", "c.txt"] {
            tied.push(catalog.insert(record(alice, name, now)).await.unwrap().id);
        }
        catalog
            .insert(record(bob, "bob.txt", now + Duration::hours(1)))
            .await
            .unwrap();

        tied.sort();
        tied.reverse();
        let mut expected = tied;
        expected.push(older.id);

        let listed: Vec<Uuid> = catalog
            .find_by_owner(alice)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(listed, expected);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_invalid_record_is_rejected_before_insert(pool: PgPool) {
        let catalog = PgFileCatalog::new(pool.clone());
        let owner = create_owner(&pool, "alice").await;

        let mut bad = record(owner, "", Utc::now());
        let err = catalog.insert(bad.clone()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        bad.original_name = "ok.txt".to_string();
        bad.size_bytes = -1;
        let err = catalog.insert(bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert_eq!(count_files(&pool).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_duplicate_stored_name_is_refused(pool: PgPool) {
        let catalog = PgFileCatalog::new(pool.clone());
        let owner = create_owner(&pool, "alice").await;

        let first = record(owner, "a.txt", Utc::now());
        let mut second = record(owner, "b.txt", Utc::now());
        second.stored_name = first.stored_name.clone();

        catalog.insert(first).await.unwrap();
        let err = catalog.insert(second).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(count_files(&pool).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_delete_by_id_is_idempotent(pool: PgPool) {
        let catalog = PgFileCatalog::new(pool.clone());
        let owner = create_owner(&pool, "alice").await;
        let file = catalog
            .insert(record(owner, "a.txt", Utc::now()))
            .await
            .unwrap();

        catalog.delete_by_id(file.id).await.unwrap();
        assert!(catalog.find_by_id(file.id).await.unwrap().is_none());

        catalog.delete_by_id(file.id).await.unwrap();
        catalog.delete_by_id(Uuid::new_v4()).await.unwrap();
        assert_eq!(count_files(&pool).await, 0);
    }
}

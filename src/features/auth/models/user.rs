use sqlx::FromRow;
use uuid::Uuid;

/// Account row from the `users` table
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

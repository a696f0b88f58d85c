//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use homehunt_core::error::{AppError, ErrorKind};
use homehunt_core::result::AppResult;
use homehunt_core::types::UserId;
use homehunt_entity::user::User;

use crate::store::UserStore;

/// Repository for users presented by the identity proxy.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn upsert_user(&self, id: UserId, display_name: Option<&str>) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, display_name) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE \
             SET display_name = COALESCE(EXCLUDED.display_name, users.display_name) \
             RETURNING *",
        )
        .bind(id)
        .bind(display_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert user", e))
    }

    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn list_user_ids(&self) -> AppResult<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>("SELECT id FROM users")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))
    }
}

//! Apartment, comment and favorite repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use homehunt_core::error::{AppError, ErrorKind};
use homehunt_core::result::AppResult;
use homehunt_core::types::{ApartmentId, UserId};
use homehunt_entity::apartment::{Apartment, Comment};

use crate::store::ApartmentStore;

/// Repository for the apartment write path.
#[derive(Debug, Clone)]
pub struct ApartmentRepository {
    pool: PgPool,
}

impl ApartmentRepository {
    /// Create a new apartment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApartmentStore for ApartmentRepository {
    async fn insert_apartment(&self, a: &Apartment) -> AppResult<Apartment> {
        sqlx::query_as::<_, Apartment>(
            "INSERT INTO apartments (id, owner_id, label, address, latitude, longitude, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(a.id)
        .bind(a.owner_id)
        .bind(&a.label)
        .bind(&a.address)
        .bind(a.latitude)
        .bind(a.longitude)
        .bind(a.status)
        .bind(a.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create apartment", e))
    }

    async fn find_apartment(&self, id: ApartmentId) -> AppResult<Option<Apartment>> {
        sqlx::query_as::<_, Apartment>("SELECT * FROM apartments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find apartment", e))
    }

    async fn list_apartments(&self) -> AppResult<Vec<Apartment>> {
        sqlx::query_as::<_, Apartment>("SELECT * FROM apartments ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list apartments", e))
    }

    async fn insert_comment(&self, c: &Comment) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (id, apartment_id, author_id, body, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(c.id)
        .bind(c.apartment_id)
        .bind(c.author_id)
        .bind(&c.body)
        .bind(c.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create comment", e))
    }

    async fn toggle_favorite(&self, user_id: UserId, apartment_id: ApartmentId) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let removed = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND apartment_id = $2")
            .bind(user_id)
            .bind(apartment_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove favorite", e))?
            .rows_affected();

        if removed == 0 {
            sqlx::query(
                "INSERT INTO favorites (user_id, apartment_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(user_id)
            .bind(apartment_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add favorite", e))?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit favorite", e)
        })?;

        Ok(removed == 0)
    }
}

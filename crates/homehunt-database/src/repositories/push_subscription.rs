//! Push subscription repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use homehunt_core::error::{AppError, ErrorKind};
use homehunt_core::result::AppResult;
use homehunt_core::types::UserId;
use homehunt_entity::push::PushSubscription;

use crate::store::PushSubscriptionStore;

/// Repository for browser push subscriptions.
#[derive(Debug, Clone)]
pub struct PushSubscriptionRepository {
    pool: PgPool,
}

impl PushSubscriptionRepository {
    /// Create a new push subscription repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PushSubscriptionStore for PushSubscriptionRepository {
    async fn upsert_subscription(&self, sub: &PushSubscription) -> AppResult<PushSubscription> {
        sqlx::query_as::<_, PushSubscription>(
            "INSERT INTO push_subscriptions (id, user_id, endpoint, p256dh, auth, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (endpoint) DO UPDATE \
             SET user_id = EXCLUDED.user_id, p256dh = EXCLUDED.p256dh, auth = EXCLUDED.auth \
             RETURNING *",
        )
        .bind(sub.id)
        .bind(sub.user_id)
        .bind(&sub.endpoint)
        .bind(&sub.p256dh)
        .bind(&sub.auth)
        .bind(sub.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save push subscription", e))
    }

    async fn subscriptions_for_user(&self, user_id: UserId) -> AppResult<Vec<PushSubscription>> {
        sqlx::query_as::<_, PushSubscription>(
            "SELECT * FROM push_subscriptions WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list push subscriptions", e)
        })
    }

    async fn delete_by_endpoint(&self, endpoint: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM push_subscriptions WHERE endpoint = $1")
            .bind(endpoint)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete push subscription", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_user(&self, user_id: UserId, endpoint: &str) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM push_subscriptions WHERE endpoint = $1 AND user_id = $2")
                .bind(endpoint)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to delete push subscription",
                        e,
                    )
                })?;
        Ok(result.rows_affected() > 0)
    }
}

//! Notification repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use homehunt_core::error::{AppError, ErrorKind};
use homehunt_core::result::AppResult;
use homehunt_core::types::{NotificationId, UserId};
use homehunt_entity::notification::{Notification, NotificationView};

use crate::store::NotificationStore;

/// Repository for notification records.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn insert_notification(&self, n: &Notification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications \
             (id, user_id, actor_id, apartment_id, notification_type, title, message, is_read, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(n.id)
        .bind(n.user_id)
        .bind(n.actor_id)
        .bind(n.apartment_id)
        .bind(n.notification_type)
        .bind(&n.title)
        .bind(&n.message)
        .bind(n.is_read)
        .bind(n.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    async fn notifications_for_user(&self, user_id: UserId) -> AppResult<Vec<NotificationView>> {
        sqlx::query_as::<_, NotificationView>(
            "SELECT n.id, n.user_id, n.actor_id, u.display_name AS actor_name, \
                    n.apartment_id, a.label AS apartment_label, n.notification_type, \
                    n.title, n.message, n.is_read, n.created_at \
             FROM notifications n \
             LEFT JOIN users u ON u.id = n.actor_id \
             LEFT JOIN apartments a ON a.id = n.apartment_id \
             WHERE n.user_id = $1 \
             ORDER BY n.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }

    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<bool> {
        // Matches already-read rows too, so a repeat call still reports a match.
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }
}

//! Persisted, per-recipient notification history.

use std::sync::Arc;

use tracing::{debug, info};

use homehunt_core::result::AppResult;
use homehunt_core::types::{ApartmentId, NotificationId, UserId};
use homehunt_database::store::NotificationStore;
use homehunt_entity::notification::{Notification, NotificationType, NotificationView};

/// Creates notification records and serves each recipient's history.
///
/// Store failures surface as `Database` errors and are never retried here.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Persist one unread notification for `recipient`.
    pub async fn create_notification(
        &self,
        recipient: UserId,
        actor: UserId,
        apartment_id: ApartmentId,
        notification_type: NotificationType,
        title: &str,
        message: &str,
    ) -> AppResult<Notification> {
        let notification = Notification::new(
            recipient,
            actor,
            apartment_id,
            notification_type,
            title,
            message,
        );
        let stored = self.store.insert_notification(&notification).await?;
        debug!(
            notification_id = %stored.id,
            recipient = %recipient,
            notification_type = %notification_type,
            "Notification recorded"
        );
        Ok(stored)
    }

    /// The recipient's notifications, newest first.
    pub async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<NotificationView>> {
        self.store.notifications_for_user(user_id).await
    }

    /// Mark one notification read.
    ///
    /// Returns `false` without error when no notification with this id
    /// belongs to `user_id`; calling it twice is harmless.
    pub async fn mark_read(&self, notification_id: NotificationId, user_id: UserId) -> AppResult<bool> {
        let matched = self.store.mark_read(notification_id, user_id).await?;
        if !matched {
            debug!(
                notification_id = %notification_id,
                user_id = %user_id,
                "mark_read matched nothing"
            );
        }
        Ok(matched)
    }

    /// Mark every notification of `user_id` read; returns how many changed.
    pub async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        let changed = self.store.mark_all_read(user_id).await?;
        info!(user_id = %user_id, changed = changed, "Marked all notifications read");
        Ok(changed)
    }

    /// Number of unread notifications.
    pub async fn unread_count(&self, user_id: UserId) -> AppResult<i64> {
        self.store.count_unread(user_id).await
    }
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish_non_exhaustive()
    }
}

//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use homehunt_core::types::{ApartmentId, NotificationId, UserId};

use super::kind::NotificationType;

/// A notification recorded for one recipient.
///
/// `is_read` only ever moves from `false` to `true`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub user_id: UserId,
    /// The user whose action produced the notification.
    pub actor_id: UserId,
    /// The apartment the event concerns.
    pub apartment_id: ApartmentId,
    /// Event type that triggered this notification.
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build an unread notification stamped with a fresh id and the current time.
    pub fn new(
        user_id: UserId,
        actor_id: UserId,
        apartment_id: ApartmentId,
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            actor_id,
            apartment_id,
            notification_type,
            title: title.into(),
            message: message.into(),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    /// Check if the notification has been read.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}

/// A notification joined with its actor's display name and the
/// apartment's label, as returned to the recipient's history view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub user_id: UserId,
    /// The user whose action produced the notification.
    pub actor_id: UserId,
    /// Actor display name, if the actor has one.
    pub actor_name: Option<String>,
    /// The apartment the event concerns.
    pub apartment_id: ApartmentId,
    /// Apartment label, if the apartment still exists.
    pub apartment_label: Option<String>,
    /// Event type.
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Read flag.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl NotificationView {
    /// Combine a notification with its enrichment fields.
    pub fn from_parts(
        notification: Notification,
        actor_name: Option<String>,
        apartment_label: Option<String>,
    ) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            actor_id: notification.actor_id,
            actor_name,
            apartment_id: notification.apartment_id,
            apartment_label,
            notification_type: notification.notification_type,
            title: notification.title,
            message: notification.message,
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification_is_unread() {
        let n = Notification::new(
            UserId::new(),
            UserId::new(),
            ApartmentId::new(),
            NotificationType::CommentCreated,
            "New Comment",
            "hello",
        );
        assert!(n.is_unread());
    }

    #[test]
    fn test_view_serializes_type_field() {
        let n = Notification::new(
            UserId::new(),
            UserId::new(),
            ApartmentId::new(),
            NotificationType::FavoriteCreated,
            "New Favorite",
            "Ana favorited Loft",
        );
        let view = NotificationView::from_parts(n, Some("Ana".into()), Some("Loft".into()));
        let json = serde_json::to_value(&view).expect("serialize");
        assert_eq!(json["type"], "favorite_created");
        assert_eq!(json["actorName"], "Ana");
        assert_eq!(json["isRead"], false);
    }
}

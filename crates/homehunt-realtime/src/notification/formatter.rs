//! Notification message formatting.

use homehunt_core::config::NotificationRealtimeConfig;
use homehunt_core::types::UserId;
use homehunt_entity::apartment::Apartment;
use homehunt_entity::notification::NotificationType;

use super::orchestrator::NotificationEvent;

/// Cut `text` to its first `max_chars` characters, appending `"..."`
/// when anything was cut.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Turns collaborative writes into notification events.
#[derive(Debug, Clone)]
pub struct NotificationFormatter {
    preview_chars: usize,
    exclude_actor: bool,
}

impl NotificationFormatter {
    /// Create a formatter from the notification settings.
    pub fn new(config: &NotificationRealtimeConfig) -> Self {
        Self {
            preview_chars: config.message_preview_chars,
            exclude_actor: config.exclude_actor,
        }
    }

    /// A new apartment listing.
    pub fn apartment_created(
        &self,
        actor_id: UserId,
        actor_name: &str,
        apartment: &Apartment,
    ) -> NotificationEvent {
        self.event(
            NotificationType::ApartmentCreated,
            actor_id,
            apartment,
            "New Apartment Added",
            format!("{actor_name} added a new apartment: {}", apartment.label),
        )
    }

    /// A new comment. The message is the comment preview.
    pub fn comment_created(
        &self,
        actor_id: UserId,
        apartment: &Apartment,
        body: &str,
    ) -> NotificationEvent {
        self.event(
            NotificationType::CommentCreated,
            actor_id,
            apartment,
            "New Comment",
            truncate_preview(body, self.preview_chars),
        )
    }

    /// A new favorite.
    pub fn favorite_created(
        &self,
        actor_id: UserId,
        actor_name: &str,
        apartment: &Apartment,
    ) -> NotificationEvent {
        self.event(
            NotificationType::FavoriteCreated,
            actor_id,
            apartment,
            "New Favorite",
            format!("{actor_name} favorited {}", apartment.label),
        )
    }

    fn event(
        &self,
        notification_type: NotificationType,
        actor_id: UserId,
        apartment: &Apartment,
        title: &str,
        message: String,
    ) -> NotificationEvent {
        NotificationEvent::new(notification_type, actor_id, apartment.id, title, message)
            .with_exclude_actor(self.exclude_actor)
    }
}

impl Default for NotificationFormatter {
    fn default() -> Self {
        Self::new(&NotificationRealtimeConfig::default())
    }
}

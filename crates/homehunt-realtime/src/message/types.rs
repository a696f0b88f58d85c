//! Inbound and outbound WebSocket message type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use homehunt_core::types::{ApartmentId, NotificationId, UserId};
use homehunt_entity::notification::{Notification, NotificationType};

/// Messages sent by the client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Bind this channel to a user.
    Authenticate {
        /// The user the channel belongs to.
        #[serde(rename = "userId")]
        user_id: UserId,
    },
    /// Application-level keepalive.
    Ping,
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// The channel is now registered under `user_id`.
    Authenticated {
        /// The registered user.
        #[serde(rename = "userId")]
        user_id: UserId,
    },
    /// Reply to [`InboundMessage::Ping`].
    Pong,
    /// A notification for the channel's user.
    Notification {
        /// Notification contents.
        data: NotificationPayload,
    },
}

/// The `data` of a notification frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// Persisted notification ID.
    pub id: NotificationId,
    /// Event type.
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// Title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Apartment the event concerns.
    pub apartment_id: ApartmentId,
}

impl From<&Notification> for NotificationPayload {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            notification_type: n.notification_type,
            title: n.title.clone(),
            message: n.message.clone(),
            created_at: n.created_at,
            apartment_id: n.apartment_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_authenticate() {
        let user = UserId::new();
        let raw = format!(r#"{{"type":"authenticate","userId":"{user}"}}"#);
        let msg: InboundMessage = serde_json::from_str(&raw).expect("parse");
        assert_eq!(msg, InboundMessage::Authenticate { user_id: user });
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(serde_json::from_str::<InboundMessage>(r#"{"type":"subscribe"}"#).is_err());
        assert!(serde_json::from_str::<InboundMessage>(r#"{"type":"authenticate"}"#).is_err());
    }

    #[test]
    fn test_notification_frame_shape() {
        let n = Notification::new(
            UserId::new(),
            UserId::new(),
            ApartmentId::new(),
            NotificationType::ApartmentCreated,
            "New Apartment Added",
            "Ana added a new apartment: Sunny Loft",
        );
        let frame = OutboundMessage::Notification {
            data: NotificationPayload::from(&n),
        };
        let json = serde_json::to_value(&frame).expect("serialize");
        assert_eq!(json["type"], "notification");
        assert_eq!(json["data"]["id"], n.id.to_string());
        assert_eq!(json["data"]["type"], "apartment_created");
        assert_eq!(json["data"]["title"], "New Apartment Added");
        assert_eq!(json["data"]["apartmentId"], n.apartment_id.to_string());
        assert!(json["data"]["createdAt"].is_string());
    }

    #[test]
    fn test_pong_and_authenticated_shapes() {
        let pong = serde_json::to_value(&OutboundMessage::Pong).expect("serialize");
        assert_eq!(pong, serde_json::json!({"type": "pong"}));

        let user = UserId::new();
        let auth = serde_json::to_value(&OutboundMessage::Authenticated { user_id: user })
            .expect("serialize");
        assert_eq!(auth["userId"], user.to_string());
    }
}

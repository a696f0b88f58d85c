//! JSON body delivered to the service worker.

use serde::{Deserialize, Serialize};

use homehunt_core::types::ApartmentId;
use homehunt_entity::notification::NotificationType;

/// A button shown on the system notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushAction {
    /// Identifier passed back to the service worker on click.
    pub action: String,
    /// Button label.
    pub title: String,
}

/// Payload of a push message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Event type.
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// Apartment the event concerns.
    pub apartment_id: ApartmentId,
    /// Icon URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Badge URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Collapse key; a newer push with the same tag replaces the older one.
    pub tag: String,
    /// Optional buttons.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<PushAction>,
}

impl PushPayload {
    /// Build a payload tagged by event type and apartment.
    pub fn new(
        notification_type: NotificationType,
        apartment_id: ApartmentId,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            notification_type,
            apartment_id,
            icon: None,
            badge: None,
            tag: format!("{}-{}", notification_type.as_str(), apartment_id),
            actions: vec![PushAction {
                action: "view".to_string(),
                title: "View".to_string(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_json_shape() {
        let apartment_id = ApartmentId::new();
        let payload = PushPayload::new(
            NotificationType::CommentCreated,
            apartment_id,
            "New Comment",
            "Bob commented on Loft",
        );
        let json = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(json["type"], "comment_created");
        assert_eq!(json["apartmentId"], apartment_id.to_string());
        assert_eq!(json["tag"], format!("comment_created-{apartment_id}"));
        assert_eq!(json["actions"][0]["action"], "view");
        assert!(json.get("icon").is_none());
    }
}

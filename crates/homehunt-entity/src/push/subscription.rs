//! Push subscription entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use homehunt_core::types::UserId;

/// A browser's push subscription, registered by one user.
///
/// `endpoint` is globally unique: re-subscribing the same endpoint
/// replaces the owner and keys of the existing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    /// Row identifier.
    pub id: Uuid,
    /// The user this browser belongs to.
    pub user_id: UserId,
    /// Provider URL deliveries are posted to.
    pub endpoint: String,
    /// Client public key (base64url).
    pub p256dh: String,
    /// Client auth secret (base64url).
    #[serde(skip_serializing)]
    pub auth: String,
    /// When the subscription was created or last refreshed.
    pub created_at: DateTime<Utc>,
}

impl PushSubscription {
    /// Build a new subscription row.
    pub fn new(
        user_id: UserId,
        endpoint: impl Into<String>,
        p256dh: impl Into<String>,
        auth: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            endpoint: endpoint.into(),
            p256dh: p256dh.into(),
            auth: auth.into(),
            created_at: Utc::now(),
        }
    }
}

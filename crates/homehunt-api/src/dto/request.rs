//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use homehunt_service::apartment::{CreateApartment, CreateComment};

/// Keys of a browser `PushSubscription`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubscriptionKeys {
    /// Client public key.
    #[validate(length(min = 1, message = "p256dh is required"))]
    pub p256dh: String,
    /// Client auth secret.
    #[validate(length(min = 1, message = "auth is required"))]
    pub auth: String,
}

/// Subscribe request: the JSON form of a browser `PushSubscription`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubscribeRequest {
    /// Push service endpoint.
    #[validate(length(min = 1, max = 2048, message = "endpoint is required"))]
    pub endpoint: String,
    /// Encryption keys.
    #[validate(nested)]
    pub keys: SubscriptionKeys,
}

/// Unsubscribe request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UnsubscribeRequest {
    /// Endpoint to remove.
    #[validate(length(min = 1, message = "endpoint is required"))]
    pub endpoint: String,
}

//! Response DTOs.

use serde::{Deserialize, Serialize};

use homehunt_realtime::metrics::MetricsSnapshot;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Count value.
    pub count: i64,
}

/// Rows affected by a bulk update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkedResponse {
    /// Notifications flipped to read.
    pub marked: u64,
}

/// Result of a favorite toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteResponse {
    /// Whether the apartment is now a favorite.
    pub favorited: bool,
}

/// VAPID public key for the client subscription flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    /// URL-safe base64 application server key.
    pub public_key: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime.
    pub uptime_seconds: u64,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Database status.
    pub database: String,
    /// Push delivery status.
    pub push: String,
    /// WebSocket connections.
    pub ws_connections: usize,
    /// Online users.
    pub online_users: usize,
    /// Fan-outs still running.
    pub fanouts_in_flight: usize,
    /// Engine counters.
    pub realtime: MetricsSnapshot,
}

/// Result of marking one notification read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResponse {
    /// Whether a notification owned by the caller matched.
    pub updated: bool,
}

//! Real-time WebSocket engine configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Maximum WebSocket connections per user.
    #[serde(default = "default_max_connections_per_user")]
    pub max_connections_per_user: usize,
    /// Outbound buffer size per connection.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// WebSocket ping interval in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Notification fan-out settings.
    #[serde(default)]
    pub notifications: NotificationRealtimeConfig,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            max_connections_per_user: default_max_connections_per_user(),
            channel_buffer_size: default_channel_buffer(),
            ping_interval_seconds: default_ping_interval(),
            notifications: NotificationRealtimeConfig::default(),
        }
    }
}

/// Who receives a persisted notification for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientPolicy {
    /// Only users holding at least one live connection.
    #[default]
    Connected,
    /// Every known user, whether connected or not.
    AllUsers,
}

/// Notification delivery settings for the real-time engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRealtimeConfig {
    /// Recipient resolution policy.
    #[serde(default)]
    pub recipient_policy: RecipientPolicy,
    /// Whether the acting user is excluded from their own events.
    #[serde(default = "default_true")]
    pub exclude_actor: bool,
    /// Maximum recipients processed concurrently per event.
    #[serde(default = "default_fanout_concurrency")]
    pub fanout_concurrency: usize,
    /// Characters of free text kept in a notification message.
    #[serde(default = "default_preview_chars")]
    pub message_preview_chars: usize,
}

impl Default for NotificationRealtimeConfig {
    fn default() -> Self {
        Self {
            recipient_policy: RecipientPolicy::default(),
            exclude_actor: true,
            fanout_concurrency: default_fanout_concurrency(),
            message_preview_chars: default_preview_chars(),
        }
    }
}

fn default_max_connections_per_user() -> usize {
    8
}

fn default_channel_buffer() -> usize {
    64
}

fn default_ping_interval() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_fanout_concurrency() -> usize {
    16
}

fn default_preview_chars() -> usize {
    50
}

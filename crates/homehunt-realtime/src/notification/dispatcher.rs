//! Notification dispatcher: writes frames to a user's live channels.

use std::sync::Arc;

use tracing::{debug, error};

use homehunt_core::types::UserId;

use crate::connection::ConnectionRegistry;
use crate::message::types::{NotificationPayload, OutboundMessage};
use crate::metrics::EngineMetrics;

/// Best-effort, at-most-once delivery to registered channels.
///
/// There is no retry and no acknowledgement. Closed or full channels
/// are skipped; removing them is the close guard's job.
#[derive(Debug)]
pub struct NotificationDispatcher {
    /// Registry to look channels up in
    registry: Arc<ConnectionRegistry>,
    /// Metrics
    metrics: Arc<EngineMetrics>,
}

impl NotificationDispatcher {
    /// Create a new dispatcher
    pub fn new(registry: Arc<ConnectionRegistry>, metrics: Arc<EngineMetrics>) -> Self {
        Self { registry, metrics }
    }

    /// Send any outbound message to every open channel of `user_id`.
    ///
    /// Returns the number of channels the frame was queued on.
    pub fn send(&self, user_id: UserId, message: &OutboundMessage) -> usize {
        let connections = self.registry.user_connections(user_id);
        if connections.is_empty() {
            return 0;
        }

        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Failed to serialize outbound message");
                return 0;
            }
        };

        let mut sent = 0;
        for conn in connections.iter().filter(|c| c.is_open()) {
            if conn.try_send(text.clone()) {
                sent += 1;
            }
        }

        let dropped = connections.len() - sent;
        self.metrics.frames(sent as u64, dropped as u64);
        debug!(user_id = %user_id, sent = sent, dropped = dropped, "Frame dispatched");
        sent
    }

    /// Send a notification frame to every open channel of `user_id`.
    pub fn send_to_user(&self, user_id: UserId, payload: &NotificationPayload) -> usize {
        self.send(
            user_id,
            &OutboundMessage::Notification {
                data: payload.clone(),
            },
        )
    }

    /// Send a notification frame to every connected user except `excluded`.
    pub fn broadcast_except(&self, excluded: UserId, payload: &NotificationPayload) -> usize {
        self.registry
            .connected_user_ids()
            .into_iter()
            .filter(|user_id| *user_id != excluded)
            .map(|user_id| self.send_to_user(user_id, payload))
            .sum()
    }
}

//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Channels ever opened
    pub connections_total: AtomicU64,
    /// Channels currently open
    pub connections_active: AtomicU64,
    /// Frames queued to channels
    pub messages_sent: AtomicU64,
    /// Frames dropped (closed channel or full buffer)
    pub messages_dropped: AtomicU64,
    /// Inbound frames received
    pub messages_received: AtomicU64,
    /// Events fanned out
    pub events_processed: AtomicU64,
    /// Notification records created by fan-out
    pub notifications_recorded: AtomicU64,
    /// Recipients whose record could not be created
    pub notification_failures: AtomicU64,
    /// Successful browser pushes
    pub pushes_delivered: AtomicU64,
}

impl EngineMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// A channel was opened.
    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// A channel was closed.
    pub fn connection_closed(&self) {
        let _ = self
            .connections_active
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| v.checked_sub(1));
    }

    /// Record the outcome of writing one frame to a set of channels.
    pub fn frames(&self, sent: u64, dropped: u64) {
        self.messages_sent.fetch_add(sent, Ordering::Relaxed);
        self.messages_dropped.fetch_add(dropped, Ordering::Relaxed);
    }

    /// An inbound frame arrived.
    pub fn message_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finished fan-out.
    pub fn event_processed(&self, recorded: u64, failed: u64, pushed: u64) {
        self.events_processed.fetch_add(1, Ordering::Relaxed);
        self.notifications_recorded.fetch_add(recorded, Ordering::Relaxed);
        self.notification_failures.fetch_add(failed, Ordering::Relaxed);
        self.pushes_delivered.fetch_add(pushed, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            events_processed: self.events_processed.load(Ordering::Relaxed),
            notifications_recorded: self.notifications_recorded.load(Ordering::Relaxed),
            notification_failures: self.notification_failures.load(Ordering::Relaxed),
            pushes_delivered: self.pushes_delivered.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Channels ever opened
    pub connections_total: u64,
    /// Channels currently open
    pub connections_active: u64,
    /// Frames queued to channels
    pub messages_sent: u64,
    /// Frames dropped
    pub messages_dropped: u64,
    /// Inbound frames received
    pub messages_received: u64,
    /// Events fanned out
    pub events_processed: u64,
    /// Notification records created by fan-out
    pub notifications_recorded: u64,
    /// Recipients whose record could not be created
    pub notification_failures: u64,
    /// Successful browser pushes
    pub pushes_delivered: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_connections_never_underflow() {
        let metrics = EngineMetrics::new();
        metrics.connection_closed();
        metrics.connection_opened();
        metrics.connection_closed();
        metrics.connection_closed();
        let snap = metrics.snapshot();
        assert_eq!(snap.connections_active, 0);
        assert_eq!(snap.connections_total, 1);
    }
}

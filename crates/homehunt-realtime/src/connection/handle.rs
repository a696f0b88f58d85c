//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// A handle to a single WebSocket connection.
///
/// Holds the sender for pushing serialized frames to the socket task
/// plus the open flag. Once closed, a handle never reopens.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Sender for outbound text frames
    sender: mpsc::Sender<String>,
    /// When the connection was opened
    pub opened_at: DateTime<Utc>,
    /// Whether the connection is still open
    open: AtomicBool,
    /// Cancelled when the handle is closed, so the socket task can hang up
    closed: CancellationToken,
}

impl ConnectionHandle {
    /// Create a new open connection handle
    pub fn new(sender: mpsc::Sender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            opened_at: Utc::now(),
            open: AtomicBool::new(true),
            closed: CancellationToken::new(),
        }
    }

    /// Queue a text frame for this connection.
    ///
    /// Never blocks: a full buffer drops the frame, a gone receiver
    /// closes the handle.
    pub fn try_send(&self, text: String) -> bool {
        if !self.is_open() {
            return false;
        }
        match self.sender.try_send(text) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Connection send buffer full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                false
            }
        }
    }

    /// Check if connection is open
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Mark connection as closed
    pub fn mark_closed(&self) {
        self.open.store(false, Ordering::SeqCst);
        self.closed.cancel();
    }

    /// Resolves once the handle has been closed.
    pub async fn closed(&self) {
        self.closed.cancelled().await
    }
}

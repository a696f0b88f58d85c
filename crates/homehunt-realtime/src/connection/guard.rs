//! Close handler installed when a channel is opened.

use std::sync::Arc;

use homehunt_core::types::UserId;

use super::handle::{ConnectionHandle, ConnectionId};
use super::registry::ConnectionRegistry;

/// Owns one open channel for the lifetime of its socket task.
///
/// Dropping the guard closes the handle and removes it from the
/// registry, whether the socket ended normally, with an error, or the
/// task was cancelled.
#[derive(Debug)]
pub struct ChannelGuard {
    registry: Arc<ConnectionRegistry>,
    handle: Arc<ConnectionHandle>,
}

impl ChannelGuard {
    pub(crate) fn new(registry: Arc<ConnectionRegistry>, handle: Arc<ConnectionHandle>) -> Self {
        Self { registry, handle }
    }

    /// The channel's connection ID.
    pub fn id(&self) -> ConnectionId {
        self.handle.id
    }

    /// The underlying handle.
    pub fn handle(&self) -> &Arc<ConnectionHandle> {
        &self.handle
    }

    /// Register this channel under `user_id`. See [`ConnectionRegistry::register`].
    pub fn authenticate(&self, user_id: UserId) -> bool {
        self.registry.register(user_id, &self.handle)
    }

    /// The user this channel is registered under, if authenticated.
    pub fn user_id(&self) -> Option<UserId> {
        self.registry.user_of(self.handle.id)
    }
}

impl Drop for ChannelGuard {
    fn drop(&mut self) {
        self.handle.mark_closed();
        self.registry.release(self.handle.id);
    }
}

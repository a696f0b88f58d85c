//! Connection registry: which live channels belong to which user.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use homehunt_core::config::RealtimeConfig;
use homehunt_core::types::UserId;

use crate::metrics::EngineMetrics;

use super::guard::ChannelGuard;
use super::handle::{ConnectionHandle, ConnectionId};

/// Thread-safe map of user → open channels.
///
/// A channel is registered under at most one user at a time, and a user
/// with no channels has no entry. Mutations are synchronous and never
/// hold a map guard across an `.await`.
#[derive(Debug)]
pub struct ConnectionRegistry {
    /// User ID → connection handles (one user can have several tabs/devices).
    by_user: DashMap<UserId, Vec<Arc<ConnectionHandle>>>,
    /// Connection ID → the user it is registered under.
    by_conn: DashMap<ConnectionId, UserId>,
    /// Configuration.
    config: RealtimeConfig,
    /// Metrics.
    metrics: Arc<EngineMetrics>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new(config: RealtimeConfig, metrics: Arc<EngineMetrics>) -> Self {
        Self {
            by_user: DashMap::new(),
            by_conn: DashMap::new(),
            config,
            metrics,
        }
    }

    /// Open a new, not yet authenticated channel.
    ///
    /// The returned guard unregisters the channel when dropped, so the
    /// socket task only has to keep it alive for as long as the socket is.
    pub fn open_channel(self: &Arc<Self>) -> (ChannelGuard, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(tx));
        self.metrics.connection_opened();
        debug!(conn_id = %handle.id, "Channel opened");
        (ChannelGuard::new(self.clone(), handle), rx)
    }

    /// Add `handle` to `user_id`'s set.
    ///
    /// Re-registering under the same user is a no-op; registering under a
    /// different user moves the channel. When the user is already at
    /// `max_connections_per_user`, the oldest channel is closed to make
    /// room. Returns `true` when the channel was (re)assigned.
    pub fn register(&self, user_id: UserId, handle: &Arc<ConnectionHandle>) -> bool {
        if !handle.is_open() {
            return false;
        }

        let previous = self.by_conn.get(&handle.id).map(|entry| *entry.value());
        match previous {
            Some(owner) if owner == user_id => return false,
            Some(owner) => {
                self.detach(owner, handle.id);
                info!(conn_id = %handle.id, from = %owner, to = %user_id, "Channel re-authenticated");
            }
            None => {}
        }

        let evicted = {
            let mut set = self.by_user.entry(user_id).or_default();
            let evicted = if set.len() >= self.config.max_connections_per_user.max(1) {
                Some(set.remove(0))
            } else {
                None
            };
            set.push(handle.clone());
            evicted
        };
        self.by_conn.insert(handle.id, user_id);

        if let Some(oldest) = evicted {
            oldest.mark_closed();
            self.by_conn.remove(&oldest.id);
            warn!(
                user_id = %user_id,
                conn_id = %oldest.id,
                max = self.config.max_connections_per_user,
                "User at max connections, closed oldest"
            );
        }

        info!(conn_id = %handle.id, user_id = %user_id, "Channel registered");
        true
    }

    /// Remove `conn_id` from `user_id`'s set. No-op when either is unknown.
    pub fn unregister(&self, user_id: UserId, conn_id: ConnectionId) {
        if self.detach(user_id, conn_id) {
            self.by_conn.remove_if(&conn_id, |_, owner| *owner == user_id);
            info!(conn_id = %conn_id, user_id = %user_id, "Channel unregistered");
        }
    }

    /// Remove `conn_id` from whichever user holds it. Called by the close guard.
    pub(crate) fn release(&self, conn_id: ConnectionId) {
        if let Some((_, user_id)) = self.by_conn.remove(&conn_id) {
            self.detach(user_id, conn_id);
            info!(conn_id = %conn_id, user_id = %user_id, "Channel unregistered");
        }
        self.metrics.connection_closed();
    }

    /// Drop the channel from the user's set and the set if it is now empty.
    fn detach(&self, user_id: UserId, conn_id: ConnectionId) -> bool {
        let removed = match self.by_user.get_mut(&user_id) {
            Some(mut set) => {
                let before = set.len();
                set.retain(|c| c.id != conn_id);
                set.len() != before
            }
            None => false,
        };
        self.by_user.remove_if(&user_id, |_, set| set.is_empty());
        removed
    }

    /// The user `conn_id` is registered under, if any.
    pub fn user_of(&self, conn_id: ConnectionId) -> Option<UserId> {
        self.by_conn.get(&conn_id).map(|entry| *entry.value())
    }

    /// Snapshot of a user's channels.
    pub fn user_connections(&self, user_id: UserId) -> Vec<Arc<ConnectionHandle>> {
        self.by_user
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Users with at least one registered channel.
    pub fn connected_user_ids(&self) -> Vec<UserId> {
        self.by_user.iter().map(|entry| *entry.key()).collect()
    }

    /// Whether the user has any registered channel.
    pub fn is_user_connected(&self, user_id: UserId) -> bool {
        self.by_user.contains_key(&user_id)
    }

    /// Number of users with at least one registered channel.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Number of registered channels.
    pub fn connection_count(&self) -> usize {
        self.by_conn.len()
    }

    /// Close every registered channel.
    pub fn close_all(&self) {
        let mut closed = 0;
        for entry in self.by_user.iter() {
            for handle in entry.value() {
                handle.mark_closed();
                closed += 1;
            }
        }
        self.by_user.clear();
        self.by_conn.clear();
        info!(count = closed, "All connections closed");
    }
}

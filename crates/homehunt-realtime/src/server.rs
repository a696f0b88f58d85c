//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tracing::info;

use homehunt_core::config::RealtimeConfig;
use homehunt_database::store::UserStore;
use homehunt_service::notification::NotificationService;
use homehunt_service::push::PushDelivery;

use crate::connection::ConnectionRegistry;
use crate::metrics::EngineMetrics;
use crate::notification::dispatcher::NotificationDispatcher;
use crate::notification::formatter::NotificationFormatter;
use crate::notification::orchestrator::NotificationOrchestrator;

/// Central real-time engine that coordinates the WebSocket subsystems.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection registry.
    pub registry: Arc<ConnectionRegistry>,
    /// Live-channel dispatcher.
    pub dispatcher: Arc<NotificationDispatcher>,
    /// Notification fan-out.
    pub orchestrator: Arc<NotificationOrchestrator>,
    /// Event text formatting.
    pub formatter: NotificationFormatter,
    /// Engine counters.
    pub metrics: Arc<EngineMetrics>,
    /// Configuration.
    pub config: RealtimeConfig,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("connections", &self.registry.connection_count())
            .finish_non_exhaustive()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(
        config: RealtimeConfig,
        notifications: NotificationService,
        users: Arc<dyn UserStore>,
        push: Arc<PushDelivery>,
    ) -> Self {
        let metrics = Arc::new(EngineMetrics::new());
        let registry = Arc::new(ConnectionRegistry::new(config.clone(), metrics.clone()));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            registry.clone(),
            metrics.clone(),
        ));
        let orchestrator = Arc::new(NotificationOrchestrator::new(
            registry.clone(),
            dispatcher.clone(),
            notifications,
            users,
            push,
            config.notifications.clone(),
            metrics.clone(),
        ));
        let formatter = NotificationFormatter::new(&config.notifications);

        info!(
            recipient_policy = ?config.notifications.recipient_policy,
            max_connections_per_user = config.max_connections_per_user,
            "Real-time engine initialized"
        );

        Self {
            registry,
            dispatcher,
            orchestrator,
            formatter,
            metrics,
            config,
        }
    }

    /// Waits for in-flight fan-outs, then closes every channel.
    pub async fn shutdown(&self) {
        info!("Shutting down real-time engine");
        self.orchestrator.shutdown().await;
        self.registry.close_all();
        info!("Real-time engine shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use homehunt_core::types::UserId;
    use homehunt_database::InMemoryStore;

    #[tokio::test]
    async fn test_shutdown_closes_channels() {
        let store = Arc::new(InMemoryStore::new());
        let engine = RealtimeEngine::new(
            RealtimeConfig::default(),
            NotificationService::new(store.clone()),
            store.clone(),
            Arc::new(PushDelivery::disabled(store.clone(), store)),
        );
        let (guard, _rx) = engine.registry.open_channel();
        guard.authenticate(UserId::new());
        assert_eq!(engine.registry.connection_count(), 1);

        engine.shutdown().await;

        assert_eq!(engine.registry.connection_count(), 0);
        assert!(!guard.handle().is_open());
    }
}

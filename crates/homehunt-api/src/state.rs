//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use homehunt_core::config::AppConfig;
use homehunt_database::DatabasePool;
use homehunt_realtime::server::RealtimeEngine;
use homehunt_service::apartment::ApartmentService;
use homehunt_service::notification::NotificationService;
use homehunt_service::push::PushDelivery;
use homehunt_service::user::UserService;

/// Shared application state passed to every handler via Axum's `State`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL pool, absent when running on in-memory stores.
    pub db_pool: Option<DatabasePool>,
    /// Real-time engine (registry, dispatcher, orchestrator).
    pub realtime: Arc<RealtimeEngine>,
    /// Notification record service.
    pub notification_service: Arc<NotificationService>,
    /// Apartment write path.
    pub apartment_service: Arc<ApartmentService>,
    /// User upsert on first sight.
    pub user_service: Arc<UserService>,
    /// Browser push side-channel.
    pub push: Arc<PushDelivery>,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("database", &self.db_pool.is_some())
            .field("push_enabled", &self.push.is_enabled())
            .finish_non_exhaustive()
    }
}

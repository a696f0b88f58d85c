//! Application builder: wires services and the real-time engine into
//! `AppState`, and router plus middleware into an Axum app.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use homehunt_core::config::{AppConfig, RecipientPolicy};
use homehunt_core::result::AppResult;
use homehunt_database::{DatabasePool, Stores};
use homehunt_realtime::server::RealtimeEngine;
use homehunt_service::apartment::ApartmentService;
use homehunt_service::notification::NotificationService;
use homehunt_service::push::PushDelivery;
use homehunt_service::user::UserService;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds every service on top of `stores` and returns the shared state.
///
/// Fails only on configuration errors (partially configured VAPID keys).
pub fn build_state(
    config: AppConfig,
    stores: Stores,
    db_pool: Option<DatabasePool>,
) -> AppResult<AppState> {
    let push = Arc::new(PushDelivery::from_config(
        &config.push,
        stores.push_subscriptions.clone(),
        stores.users.clone(),
    )?);

    if config.realtime.notifications.recipient_policy == RecipientPolicy::AllUsers {
        warn!("recipient_policy = all_users: offline users will accumulate notification records");
    }

    let notification_service = NotificationService::new(stores.notifications.clone());
    let realtime = Arc::new(RealtimeEngine::new(
        config.realtime.clone(),
        notification_service.clone(),
        stores.users.clone(),
        push.clone(),
    ));

    info!(
        database = db_pool.is_some(),
        push_enabled = push.is_enabled(),
        "Application state initialized"
    );

    Ok(AppState {
        config: Arc::new(config),
        db_pool,
        realtime,
        notification_service: Arc::new(notification_service),
        apartment_service: Arc::new(ApartmentService::new(stores.apartments.clone())),
        user_service: Arc::new(UserService::new(stores.users.clone())),
        push,
        started_at: Instant::now(),
    })
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(axum_middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

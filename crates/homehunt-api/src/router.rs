//! Route definitions for the HomeHunt HTTP API.
//!
//! All REST routes are mounted under `/api`; the WebSocket endpoint lives
//! at `/ws`. The router receives `AppState` and passes it to all handlers
//! via Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Build the route tree without middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(notification_routes())
        .merge(push_routes())
        .merge(apartment_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::ws_upgrade))
        .with_state(state)
}

/// Notification inbox
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
}

/// Browser push subscriptions
fn push_routes() -> Router<AppState> {
    Router::new()
        .route("/push/public-key", get(handlers::push::public_key))
        .route("/push/subscribe", post(handlers::push::subscribe))
        .route("/push/unsubscribe", post(handlers::push::unsubscribe))
}

/// Apartments, comments, favorites
fn apartment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/apartments",
            get(handlers::apartment::list_apartments).post(handlers::apartment::create_apartment),
        )
        .route(
            "/apartments/{id}/comments",
            post(handlers::apartment::add_comment),
        )
        .route(
            "/apartments/{id}/favorite",
            post(handlers::apartment::toggle_favorite),
        )
}

/// Liveness and engine status
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

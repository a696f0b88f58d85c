//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let database = match &state.db_pool {
        None => "in_memory",
        Some(pool) => match pool.health_check().await {
            Ok(true) => "connected",
            _ => "unavailable",
        },
    };
    let push = if state.push.is_enabled() {
        "enabled"
    } else {
        "disabled"
    };
    let status = if database == "unavailable" {
        "degraded"
    } else {
        "ok"
    };

    let realtime = &state.realtime;
    Json(ApiResponse::ok(DetailedHealthResponse {
        status: status.to_string(),
        database: database.to_string(),
        push: push.to_string(),
        ws_connections: realtime.registry.connection_count(),
        online_users: realtime.registry.user_count(),
        fanouts_in_flight: realtime.orchestrator.in_flight(),
        realtime: realtime.metrics.snapshot(),
    }))
}

//! Notification handlers.

use axum::Json;
use axum::extract::{Path, State};

use homehunt_core::types::NotificationId;
use homehunt_entity::notification::NotificationView;

use crate::dto::response::{ApiResponse, CountResponse, MarkedResponse, ReadResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<NotificationView>>>> {
    let notifications = state.notification_service.list_for_user(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(notifications)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.notification_service.unread_count(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/{id}/read
///
/// Marking a notification that is already read, or that is not the
/// caller's, succeeds with `updated: false` for the latter.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NotificationId>,
) -> ApiResult<Json<ApiResponse<ReadResponse>>> {
    let updated = state
        .notification_service
        .mark_read(id, auth.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(ReadResponse { updated })))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<MarkedResponse>>> {
    let marked = state.notification_service.mark_all_read(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(MarkedResponse { marked })))
}

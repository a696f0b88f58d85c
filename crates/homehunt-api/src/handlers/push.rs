//! Browser push subscription handlers.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use homehunt_core::error::AppError;
use homehunt_entity::push::PushSubscription;

use crate::dto::request::{SubscribeRequest, UnsubscribeRequest};
use crate::dto::response::{ApiResponse, MessageResponse, PublicKeyResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/push/public-key
pub async fn public_key(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<PublicKeyResponse>>> {
    let public_key = state
        .push
        .public_key()
        .ok_or_else(|| AppError::service_unavailable("Push notifications are not configured"))?;
    Ok(Json(ApiResponse::ok(PublicKeyResponse {
        public_key: public_key.to_string(),
    })))
}

/// POST /api/push/subscribe
pub async fn subscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SubscribeRequest>,
) -> ApiResult<Json<ApiResponse<PushSubscription>>> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Invalid subscription: {e}")))?;

    let subscription = state
        .push
        .subscribe(auth.user_id, &req.endpoint, &req.keys.p256dh, &req.keys.auth)
        .await?;
    Ok(Json(ApiResponse::ok(subscription)))
}

/// POST /api/push/unsubscribe
pub async fn unsubscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UnsubscribeRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))?;

    let removed = state.push.unsubscribe(auth.user_id, &req.endpoint).await?;
    let message = if removed {
        "Unsubscribed"
    } else {
        "No matching subscription"
    };
    Ok(Json(ApiResponse::ok(MessageResponse::new(message))))
}

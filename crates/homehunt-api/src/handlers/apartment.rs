//! Apartment handlers: the write path that feeds notification fan-out.
//!
//! Each handler commits the primary write first and only then hands the
//! event to the orchestrator in the background, so a slow or failing
//! fan-out never delays or fails the response.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use homehunt_core::types::ApartmentId;
use homehunt_entity::apartment::{Apartment, Comment};

use crate::dto::request::{CreateApartment, CreateComment};
use crate::dto::response::{ApiResponse, FavoriteResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/apartments
pub async fn list_apartments(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<Apartment>>>> {
    let apartments = state.apartment_service.list_apartments().await?;
    Ok(Json(ApiResponse::ok(apartments)))
}

/// POST /api/apartments
pub async fn create_apartment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateApartment>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Apartment>>)> {
    let apartment = state
        .apartment_service
        .create_apartment(auth.context(), req)
        .await?;

    let event = state.realtime.formatter.apartment_created(
        auth.user_id,
        &auth.display_name,
        &apartment,
    );
    state.realtime.orchestrator.spawn_event(event);

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(apartment))))
}

/// POST /api/apartments/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(apartment_id): Path<ApartmentId>,
    Json(req): Json<CreateComment>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Comment>>)> {
    let added = state
        .apartment_service
        .add_comment(auth.context(), apartment_id, req)
        .await?;

    let event = state.realtime.formatter.comment_created(
        auth.user_id,
        &added.apartment,
        &added.comment.body,
    );
    state.realtime.orchestrator.spawn_event(event);

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(added.comment))))
}

/// POST /api/apartments/{id}/favorite
pub async fn toggle_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(apartment_id): Path<ApartmentId>,
) -> ApiResult<Json<ApiResponse<FavoriteResponse>>> {
    let toggled = state
        .apartment_service
        .toggle_favorite(auth.context(), apartment_id)
        .await?;

    // Removing a favorite is silent.
    if toggled.favorited {
        let event = state.realtime.formatter.favorite_created(
            auth.user_id,
            &auth.display_name,
            &toggled.apartment,
        );
        state.realtime.orchestrator.spawn_event(event);
    }

    Ok(Json(ApiResponse::ok(FavoriteResponse {
        favorited: toggled.favorited,
    })))
}

//! Browse session API handlers.
//!
//! A session maps one-to-one onto a [`BrowseController`]; commands apply
//! to it and return the resulting observable state.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gamedex_core::{BrowseController, BrowseUiState};

use super::{error_json, ErrorResponse, SuccessResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub id: Uuid,
    pub state: BrowseUiState,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct GenreRequest {
    /// `null` clears the filter back to the unfiltered catalog.
    pub genre_id: Option<i64>,
}

/// POST /api/v1/browse
///
/// Start a browse session and run its initial load.
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let (id, controller) = state.create_session().await;
    controller.load_initial().await;

    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            id,
            state: controller.current(),
        }),
    )
}

/// GET /api/v1/browse/{id}
///
/// Current observable state of a session.
pub async fn get_state(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BrowseUiState>, (StatusCode, Json<ErrorResponse>)> {
    let controller = lookup(&state, id).await?;
    Ok(Json(controller.current()))
}

/// POST /api/v1/browse/{id}/search
///
/// Narrow the working set locally; no catalog request is made.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<BrowseUiState>, (StatusCode, Json<ErrorResponse>)> {
    let controller = lookup(&state, id).await?;
    controller.set_search_query(&request.query).await;
    Ok(Json(controller.current()))
}

/// POST /api/v1/browse/{id}/genre
///
/// Switch the genre filter and refetch page 1.
pub async fn select_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<GenreRequest>,
) -> Result<Json<BrowseUiState>, (StatusCode, Json<ErrorResponse>)> {
    let controller = lookup(&state, id).await?;
    controller.select_genre(request.genre_id).await;
    Ok(Json(controller.current()))
}

/// POST /api/v1/browse/{id}/next-page
pub async fn next_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BrowseUiState>, (StatusCode, Json<ErrorResponse>)> {
    let controller = lookup(&state, id).await?;
    controller.load_next_page().await;
    Ok(Json(controller.current()))
}

/// POST /api/v1/browse/{id}/retry
pub async fn retry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BrowseUiState>, (StatusCode, Json<ErrorResponse>)> {
    let controller = lookup(&state, id).await?;
    controller.retry().await;
    Ok(Json(controller.current()))
}

/// DELETE /api/v1/browse/{id}
///
/// Tear the session down; anything still in flight is discarded.
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if state.remove_session(id).await {
        (
            StatusCode::OK,
            Json(SuccessResponse {
                message: format!("Session {} ended", id),
            }),
        )
            .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            error_json(format!("Session not found: {}", id)),
        )
            .into_response()
    }
}

async fn lookup(
    state: &AppState,
    id: Uuid,
) -> Result<Arc<BrowseController>, (StatusCode, Json<ErrorResponse>)> {
    state.session(id).await.ok_or((
        StatusCode::NOT_FOUND,
        error_json(format!("Session not found: {}", id)),
    ))
}

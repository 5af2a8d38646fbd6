//! Cache introspection and reset handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use gamedex_core::CacheStats;

use super::{error_json, ErrorResponse, SuccessResponse};
use crate::state::AppState;

/// GET /api/v1/cache/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CacheStats>, impl IntoResponse> {
    match state.repository().cache_stats() {
        Ok(stats) => Ok(Json(stats)),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, error_json(e.to_string()))),
    }
}

/// DELETE /api/v1/cache
///
/// The explicit user-triggered reset: clears games and genres alike.
pub async fn clear_cache(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.repository().clear_cache() {
        Ok(()) => Ok(Json(SuccessResponse {
            message: "Cache cleared".to_string(),
        })),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, error_json(e.to_string()))),
    }
}

//! Game detail API handler.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use gamedex_core::{load_game_detail, DetailUiState};

use crate::state::AppState;

/// GET /api/v1/games/{id}
///
/// Assemble a game detail view. The id arrives as a raw path segment; an
/// unparseable one is rejected without any catalog request.
pub async fn get_game_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<DetailUiState>) {
    let Ok(id) = id.parse::<i64>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(DetailUiState::Error {
                message: "Invalid game ID".to_string(),
            }),
        );
    };

    let detail = load_game_detail(state.repository(), id).await;
    let status = match &detail {
        DetailUiState::Error { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    };
    (status, Json(detail))
}

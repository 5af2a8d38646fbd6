use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{browse, cache, games, handlers};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        // Browse sessions
        .route("/browse", post(browse::create_session))
        .route("/browse/{id}", get(browse::get_state))
        .route("/browse/{id}", delete(browse::end_session))
        .route("/browse/{id}/search", post(browse::search))
        .route("/browse/{id}/genre", post(browse::select_genre))
        .route("/browse/{id}/next-page", post(browse::next_page))
        .route("/browse/{id}/retry", post(browse::retry))
        // Game details
        .route("/games/{id}", get(games::get_game_detail))
        // Cache introspection and reset
        .route("/cache/stats", get(cache::get_stats))
        .route("/cache", delete(cache::clear_cache))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

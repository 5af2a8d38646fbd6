pub mod browse;
pub mod cache;
pub mod games;
pub mod handlers;
pub mod routes;

pub use routes::create_router;

use axum::Json;
use serde::Serialize;

/// Standard error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Standard confirmation payload.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

pub(crate) fn error_json(message: impl Into<String>) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: message.into(),
    })
}

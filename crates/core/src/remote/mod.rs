//! Remote game catalog integration.
//!
//! This module provides the client for the remote catalog API that the
//! repository layer reconciles against the local cache.

mod rawg;
mod types;

pub use rawg::{RawgClient, RawgConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the remote catalog.
///
/// These never cross the [`RemoteCatalogSource`] boundary; the trait
/// implementation converts them to absence after logging.
#[derive(Debug, Error)]
pub enum RemoteCatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for the remote game catalog.
///
/// Every operation catches its own transport failures internally and
/// degrades to absence or an empty listing, so callers never have to
/// distinguish "not found" from "network down" at this boundary.
#[async_trait]
pub trait RemoteCatalogSource: Send + Sync {
    /// List one page of games, optionally filtered by genre and search text.
    async fn list_games(
        &self,
        page: u32,
        genre_id: Option<i64>,
        search: Option<&str>,
    ) -> Option<GamesPage>;

    /// Get a single game's full details.
    async fn game_details(&self, id: i64) -> Option<Game>;

    /// List all genres.
    async fn list_genres(&self) -> Option<Vec<Genre>>;

    /// List a game's screenshots (possibly empty).
    async fn list_screenshots(&self, id: i64) -> Vec<Screenshot>;

    /// List a game's trailers.
    async fn list_movies(&self, id: i64) -> Option<Vec<GameMovie>>;
}

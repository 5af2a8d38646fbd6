//! Local game catalog cache.
//!
//! The store keeps the last successfully fetched unfiltered home page and
//! individually fetched game details, so a previously seen catalog stays
//! browsable when the network is unavailable.

mod sqlite;

pub use sqlite::SqliteCatalogStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::remote::{Game, Genre};

/// Errors for cache store operations.
///
/// Absence is never an error; lookups return empty results instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Cache statistics, for the introspection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    /// Cached games.
    pub games: u64,
    /// Cached genres.
    pub genres: u64,
    /// Oldest cache write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_entry: Option<DateTime<Utc>>,
    /// Most recent cache write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_entry: Option<DateTime<Utc>>,
}

/// Trait for the local catalog cache.
///
/// A write with an existing id replaces the prior record in full; there is
/// no field-level merge. Batch writes are atomic: a reader never observes
/// a partially written batch.
pub trait CatalogStore: Send + Sync {
    /// Get a cached game by id.
    fn game(&self, id: i64) -> Result<Option<Game>, StoreError>;

    /// Get a window of cached games, ordered by write recency (most recent
    /// first; within one batch write, batch order).
    fn games_page(&self, limit: u32, offset: u32) -> Result<Vec<Game>, StoreError>;

    /// Get all cached games, same ordering as [`games_page`](Self::games_page).
    fn all_games(&self) -> Result<Vec<Game>, StoreError>;

    /// Insert or fully replace a single game.
    fn put_game(&self, game: &Game) -> Result<(), StoreError>;

    /// Insert or fully replace a batch of games in one transaction.
    fn put_games(&self, games: &[Game]) -> Result<(), StoreError>;

    /// Remove all cached games.
    fn clear_games(&self) -> Result<(), StoreError>;

    /// Number of cached games.
    fn count_games(&self) -> Result<u64, StoreError>;

    /// Get all cached genres, ordered by name ascending.
    fn genres(&self) -> Result<Vec<Genre>, StoreError>;

    /// Insert or fully replace a batch of genres in one transaction.
    fn put_genres(&self, genres: &[Genre]) -> Result<(), StoreError>;

    /// Remove all cached genres.
    fn clear_genres(&self) -> Result<(), StoreError>;

    /// Number of cached genres.
    fn count_genres(&self) -> Result<u64, StoreError>;

    /// Cache statistics.
    fn stats(&self) -> Result<CacheStats, StoreError>;
}

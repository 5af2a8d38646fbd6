//! Catalog repository - reconciles the remote catalog with the local cache.
//!
//! This is the single entry point the rest of the system depends on. Games
//! are network-first with the cache as the offline fallback, genres are
//! cache-first because they almost never change. Every method is a linear
//! decision tree with at most two fallback tiers (remote, cache, empty);
//! failures are recovered here and never propagate to callers.

use std::sync::Arc;

use tracing::warn;

use crate::metrics::{CACHE_FALLBACKS, CACHE_WRITES};
use crate::remote::{Game, GameMovie, Genre, RemoteCatalogSource, Screenshot};
use crate::store::{CacheStats, CatalogStore, StoreError};

/// How many cached games the offline home page serves.
const CACHE_FALLBACK_LIMIT: u32 = 100;

/// Repository over the remote catalog and the local cache.
///
/// The cache only ever holds the unfiltered first page (the canonical
/// "home" view) plus individually fetched game details; filtered or paged
/// requests have no cache fallback.
pub struct GameRepository {
    remote: Arc<dyn RemoteCatalogSource>,
    store: Arc<dyn CatalogStore>,
}

impl GameRepository {
    pub fn new(remote: Arc<dyn RemoteCatalogSource>, store: Arc<dyn CatalogStore>) -> Self {
        Self { remote, store }
    }

    /// Fetch one page of games.
    ///
    /// Remote first. A non-empty remote response is the source of truth;
    /// when the request is the canonical first page (page 1, no genre, no
    /// search) the response also replaces the cached home snapshot. When
    /// the remote is empty or unreachable, the canonical first page falls
    /// back to the cache and every other request resolves to empty.
    pub async fn games(
        &self,
        page: u32,
        genre_id: Option<i64>,
        search: Option<&str>,
    ) -> Vec<Game> {
        let canonical = page == 1 && genre_id.is_none() && search.is_none();

        let listing = self.remote.list_games(page, genre_id, search).await;
        match listing {
            Some(listing) if !listing.games.is_empty() => {
                if canonical {
                    if let Err(e) = self.store.put_games(&listing.games) {
                        // A failed snapshot write is handled like an empty
                        // remote response: serve whatever the cache holds.
                        warn!("Failed to cache home page snapshot: {}", e);
                        return self.cached_home_page();
                    }
                    CACHE_WRITES
                        .with_label_values(&["games"])
                        .inc_by(listing.games.len() as u64);
                }
                listing.games
            }
            _ if canonical => {
                CACHE_FALLBACKS.with_label_values(&["games"]).inc();
                self.cached_home_page()
            }
            _ => Vec::new(),
        }
    }

    fn cached_home_page(&self) -> Vec<Game> {
        self.store
            .games_page(CACHE_FALLBACK_LIMIT, 0)
            .unwrap_or_else(|e| {
                warn!("Cache read failed for home page fallback: {}", e);
                Vec::new()
            })
    }

    /// Fetch a single game's details.
    ///
    /// Network-first with write-through; a remote miss falls back to the
    /// cached record, which may itself be absent.
    pub async fn game_details(&self, id: i64) -> Option<Game> {
        match self.remote.game_details(id).await {
            Some(game) => {
                if let Err(e) = self.store.put_game(&game) {
                    warn!("Failed to cache game {}: {}", id, e);
                } else {
                    CACHE_WRITES.with_label_values(&["games"]).inc();
                }
                Some(game)
            }
            None => {
                CACHE_FALLBACKS.with_label_values(&["game_details"]).inc();
                self.store.game(id).unwrap_or_else(|e| {
                    warn!("Cache read failed for game {}: {}", id, e);
                    None
                })
            }
        }
    }

    /// Fetch the genre list.
    ///
    /// Cache-first: genres are near-static reference data, so a populated
    /// cache is served without consulting the remote at all.
    pub async fn genres(&self) -> Vec<Genre> {
        let cached_count = self.store.count_genres().unwrap_or(0);
        if cached_count > 0 {
            return self.store.genres().unwrap_or_else(|e| {
                warn!("Cache read failed for genres: {}", e);
                Vec::new()
            });
        }

        match self.remote.list_genres().await {
            Some(genres) if !genres.is_empty() => {
                if let Err(e) = self.store.put_genres(&genres) {
                    warn!("Failed to cache genres: {}", e);
                    return self.store.genres().unwrap_or_default();
                }
                CACHE_WRITES
                    .with_label_values(&["genres"])
                    .inc_by(genres.len() as u64);
                genres
            }
            _ => Vec::new(),
        }
    }

    /// Clear both the game cache and the genre cache. There is no
    /// partial-clear variant.
    pub fn clear_cache(&self) -> Result<(), StoreError> {
        self.store.clear_games()?;
        self.store.clear_genres()?;
        Ok(())
    }

    /// Screenshots are always fetched fresh; the cache is never involved.
    pub async fn game_screenshots(&self, id: i64) -> Vec<Screenshot> {
        self.remote.list_screenshots(id).await
    }

    /// Trailers are always fetched fresh; the cache is never involved.
    pub async fn game_movies(&self, id: i64) -> Vec<GameMovie> {
        self.remote.list_movies(id).await.unwrap_or_default()
    }

    pub fn has_cached_games(&self) -> bool {
        self.store.count_games().unwrap_or(0) > 0
    }

    pub fn has_cached_genres(&self) -> bool {
        self.store.count_genres().unwrap_or(0) > 0
    }

    pub fn cache_stats(&self) -> Result<CacheStats, StoreError> {
        self.store.stats()
    }
}

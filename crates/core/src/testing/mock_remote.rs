//! Mock remote catalog for testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::remote::{Game, GameMovie, GamesPage, Genre, RemoteCatalogSource, Screenshot};

/// A recorded remote call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRemoteCall {
    ListGames {
        page: u32,
        genre_id: Option<i64>,
        search: Option<String>,
    },
    GameDetails {
        id: i64,
    },
    ListGenres,
    ListScreenshots {
        id: i64,
    },
    ListMovies {
        id: i64,
    },
}

/// Mock implementation of the [`RemoteCatalogSource`] trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable pages/details/genres/screenshots/movies
/// - Track calls for assertions
/// - Simulate the network being unavailable (`set_offline`)
/// - Add artificial latency (`set_delay`) for in-flight assertions
///
/// Like the real client, failure is expressed as absence, never as an
/// error crossing the trait boundary.
#[derive(Debug)]
pub struct MockRemoteCatalog {
    /// Games pages keyed by (page, genre filter, search text).
    pages: Arc<RwLock<HashMap<(u32, Option<i64>, Option<String>), GamesPage>>>,
    /// Game details by id.
    details: Arc<RwLock<HashMap<i64, Game>>>,
    /// The genre listing.
    genres: Arc<RwLock<Option<Vec<Genre>>>>,
    /// Screenshots by game id.
    screenshots: Arc<RwLock<HashMap<i64, Vec<Screenshot>>>>,
    /// Movies by game id.
    movies: Arc<RwLock<HashMap<i64, Vec<GameMovie>>>>,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedRemoteCall>>>,
    /// When true, every operation degrades to absence.
    offline: Arc<RwLock<bool>>,
    /// Artificial latency applied to every operation.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockRemoteCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemoteCatalog {
    /// Create a new empty mock remote catalog.
    pub fn new() -> Self {
        Self {
            pages: Arc::new(RwLock::new(HashMap::new())),
            details: Arc::new(RwLock::new(HashMap::new())),
            genres: Arc::new(RwLock::new(None)),
            screenshots: Arc::new(RwLock::new(HashMap::new())),
            movies: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            offline: Arc::new(RwLock::new(false)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the games page returned for an exact (page, genre, search) request.
    pub async fn set_games_page(
        &self,
        page: u32,
        genre_id: Option<i64>,
        search: Option<&str>,
        listing: GamesPage,
    ) {
        self.pages
            .write()
            .await
            .insert((page, genre_id, search.map(str::to_string)), listing);
    }

    /// Set the canonical home page (page 1, unfiltered).
    pub async fn set_home_page(&self, games: Vec<Game>) {
        let listing = GamesPage {
            count: games.len() as i64,
            games,
        };
        self.set_games_page(1, None, None, listing).await;
    }

    /// Set the details returned for a game id.
    pub async fn set_game_details(&self, game: Game) {
        self.details.write().await.insert(game.id, game);
    }

    /// Set the genre listing.
    pub async fn set_genres(&self, genres: Vec<Genre>) {
        *self.genres.write().await = Some(genres);
    }

    /// Set the screenshots for a game id.
    pub async fn set_screenshots(&self, id: i64, screenshots: Vec<Screenshot>) {
        self.screenshots.write().await.insert(id, screenshots);
    }

    /// Set the movies for a game id.
    pub async fn set_movies(&self, id: i64, movies: Vec<GameMovie>) {
        self.movies.write().await.insert(id, movies);
    }

    /// Make every operation behave as if the network were unreachable.
    pub async fn set_offline(&self, offline: bool) {
        *self.offline.write().await = offline;
    }

    /// Add artificial latency to every operation.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedRemoteCall> {
        self.calls.read().await.clone()
    }

    /// Clear recorded calls.
    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }

    /// Number of calls performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    async fn record(&self, call: RecordedRemoteCall) {
        self.calls.write().await.push(call);
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    async fn is_offline(&self) -> bool {
        *self.offline.read().await
    }
}

#[async_trait]
impl RemoteCatalogSource for MockRemoteCatalog {
    async fn list_games(
        &self,
        page: u32,
        genre_id: Option<i64>,
        search: Option<&str>,
    ) -> Option<GamesPage> {
        self.record(RecordedRemoteCall::ListGames {
            page,
            genre_id,
            search: search.map(str::to_string),
        })
        .await;

        if self.is_offline().await {
            return None;
        }

        self.pages
            .read()
            .await
            .get(&(page, genre_id, search.map(str::to_string)))
            .cloned()
    }

    async fn game_details(&self, id: i64) -> Option<Game> {
        self.record(RecordedRemoteCall::GameDetails { id }).await;

        if self.is_offline().await {
            return None;
        }

        self.details.read().await.get(&id).cloned()
    }

    async fn list_genres(&self) -> Option<Vec<Genre>> {
        self.record(RecordedRemoteCall::ListGenres).await;

        if self.is_offline().await {
            return None;
        }

        self.genres.read().await.clone()
    }

    async fn list_screenshots(&self, id: i64) -> Vec<Screenshot> {
        self.record(RecordedRemoteCall::ListScreenshots { id }).await;

        if self.is_offline().await {
            return Vec::new();
        }

        self.screenshots
            .read()
            .await
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    async fn list_movies(&self, id: i64) -> Option<Vec<GameMovie>> {
        self.record(RecordedRemoteCall::ListMovies { id }).await;

        if self.is_offline().await {
            return None;
        }

        self.movies.read().await.get(&id).cloned()
    }
}

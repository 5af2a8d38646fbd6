//! RAWG video game catalog API client.
//!
//! RAWG requires an API key, passed as a `key` query parameter on every
//! request. The free tier allows 20,000 requests per month.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::{Game, GameMovie, GamesPage, Genre, Screenshot};
use super::{RemoteCatalogError, RemoteCatalogSource};
use crate::metrics::REMOTE_REQUESTS;

/// RAWG API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawgConfig {
    /// RAWG API key (required).
    pub api_key: String,
    /// Base URL (default: https://api.rawg.io/api).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Games per page (default: 20, catalog maximum: 40).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_page_size() -> u32 {
    20
}

fn default_timeout() -> u32 {
    30
}

/// RAWG API client.
pub struct RawgClient {
    client: Client,
    base_url: String,
    api_key: String,
    page_size: u32,
}

impl RawgClient {
    /// Create a new RAWG client.
    pub fn new(config: RawgConfig) -> Result<Self, RemoteCatalogError> {
        if config.api_key.is_empty() {
            return Err(RemoteCatalogError::NotConfigured(
                "RAWG API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.rawg.io/api".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            page_size: config.page_size,
        })
    }

    /// List one page of games, optionally filtered by genre and search text.
    pub async fn fetch_games(
        &self,
        page: u32,
        genre_id: Option<i64>,
        search: Option<&str>,
    ) -> Result<GamesPage, RemoteCatalogError> {
        let url = format!("{}/games", self.base_url);

        debug!(
            "RAWG games list: page={}, genre={:?}, search={:?}",
            page, genre_id, search
        );

        let mut request = self.client.get(&url).query(&[
            ("key", &self.api_key),
            ("page", &page.to_string()),
            ("page_size", &self.page_size.to_string()),
        ]);

        if let Some(id) = genre_id {
            request = request.query(&[("genres", &id.to_string())]);
        }
        if let Some(text) = search {
            request = request.query(&[("search", text)]);
        }

        let response = request.send().await?;
        let response = Self::check_status(response, "games list").await?;

        response.json::<GamesPage>().await.map_err(|e| {
            RemoteCatalogError::ParseError(format!("Failed to parse games list response: {}", e))
        })
    }

    /// Get a single game's full details.
    pub async fn fetch_game_details(&self, id: i64) -> Result<Game, RemoteCatalogError> {
        let url = format!("{}/games/{}", self.base_url, id);

        debug!("RAWG game details: id={}", id);

        let response = self
            .client
            .get(&url)
            .query(&[("key", &self.api_key)])
            .send()
            .await?;
        let response = Self::check_status(response, &format!("game {}", id)).await?;

        response.json::<Game>().await.map_err(|e| {
            RemoteCatalogError::ParseError(format!("Failed to parse game details response: {}", e))
        })
    }

    /// List all genres.
    pub async fn fetch_genres(&self) -> Result<Vec<Genre>, RemoteCatalogError> {
        let url = format!("{}/genres", self.base_url);

        debug!("RAWG genres list");

        let response = self
            .client
            .get(&url)
            .query(&[("key", &self.api_key)])
            .send()
            .await?;
        let response = Self::check_status(response, "genres list").await?;

        let listing: ResultsEnvelope<Genre> = response.json().await.map_err(|e| {
            RemoteCatalogError::ParseError(format!("Failed to parse genres response: {}", e))
        })?;

        Ok(listing.results)
    }

    /// List a game's screenshots.
    pub async fn fetch_screenshots(&self, id: i64) -> Result<Vec<Screenshot>, RemoteCatalogError> {
        let url = format!("{}/games/{}/screenshots", self.base_url, id);

        debug!("RAWG screenshots: id={}", id);

        let response = self
            .client
            .get(&url)
            .query(&[("key", &self.api_key)])
            .send()
            .await?;
        let response = Self::check_status(response, &format!("screenshots for game {}", id)).await?;

        let listing: ResultsEnvelope<Screenshot> = response.json().await.map_err(|e| {
            RemoteCatalogError::ParseError(format!("Failed to parse screenshots response: {}", e))
        })?;

        Ok(listing.results)
    }

    /// List a game's trailers.
    pub async fn fetch_movies(&self, id: i64) -> Result<Vec<GameMovie>, RemoteCatalogError> {
        let url = format!("{}/games/{}/movies", self.base_url, id);

        debug!("RAWG movies: id={}", id);

        let response = self
            .client
            .get(&url)
            .query(&[("key", &self.api_key)])
            .send()
            .await?;
        let response = Self::check_status(response, &format!("movies for game {}", id)).await?;

        let listing: ResultsEnvelope<GameMovie> = response.json().await.map_err(|e| {
            RemoteCatalogError::ParseError(format!("Failed to parse movies response: {}", e))
        })?;

        Ok(listing.results)
    }

    async fn check_status(
        response: reqwest::Response,
        what: &str,
    ) -> Result<reqwest::Response, RemoteCatalogError> {
        let status = response.status();
        if status == 401 {
            return Err(RemoteCatalogError::NotConfigured(
                "Invalid RAWG API key".to_string(),
            ));
        }
        if status == 404 {
            return Err(RemoteCatalogError::NotFound(what.to_string()));
        }
        if status == 429 {
            return Err(RemoteCatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteCatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(response)
    }
}

/// The catalog wraps every listing in `{"results": [...]}`.
#[derive(Debug, Deserialize)]
struct ResultsEnvelope<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

/// The trait boundary degrades every failure to absence: transport errors
/// never propagate past the remote source, they are logged and counted here.
#[async_trait]
impl RemoteCatalogSource for RawgClient {
    async fn list_games(
        &self,
        page: u32,
        genre_id: Option<i64>,
        search: Option<&str>,
    ) -> Option<GamesPage> {
        match self.fetch_games(page, genre_id, search).await {
            Ok(listing) => {
                REMOTE_REQUESTS.with_label_values(&["games", "ok"]).inc();
                Some(listing)
            }
            Err(e) => {
                REMOTE_REQUESTS.with_label_values(&["games", "error"]).inc();
                warn!("Games list request failed: {}", e);
                None
            }
        }
    }

    async fn game_details(&self, id: i64) -> Option<Game> {
        match self.fetch_game_details(id).await {
            Ok(game) => {
                REMOTE_REQUESTS.with_label_values(&["game_details", "ok"]).inc();
                Some(game)
            }
            Err(e) => {
                REMOTE_REQUESTS
                    .with_label_values(&["game_details", "error"])
                    .inc();
                warn!("Game details request failed for {}: {}", id, e);
                None
            }
        }
    }

    async fn list_genres(&self) -> Option<Vec<Genre>> {
        match self.fetch_genres().await {
            Ok(genres) => {
                REMOTE_REQUESTS.with_label_values(&["genres", "ok"]).inc();
                Some(genres)
            }
            Err(e) => {
                REMOTE_REQUESTS.with_label_values(&["genres", "error"]).inc();
                warn!("Genres request failed: {}", e);
                None
            }
        }
    }

    async fn list_screenshots(&self, id: i64) -> Vec<Screenshot> {
        match self.fetch_screenshots(id).await {
            Ok(screenshots) => {
                REMOTE_REQUESTS
                    .with_label_values(&["screenshots", "ok"])
                    .inc();
                screenshots
            }
            Err(e) => {
                REMOTE_REQUESTS
                    .with_label_values(&["screenshots", "error"])
                    .inc();
                warn!("Screenshots request failed for {}: {}", id, e);
                Vec::new()
            }
        }
    }

    async fn list_movies(&self, id: i64) -> Option<Vec<GameMovie>> {
        match self.fetch_movies(id).await {
            Ok(movies) => {
                REMOTE_REQUESTS.with_label_values(&["movies", "ok"]).inc();
                Some(movies)
            }
            Err(e) => {
                REMOTE_REQUESTS.with_label_values(&["movies", "error"]).inc();
                warn!("Movies request failed for {}: {}", id, e);
                None
            }
        }
    }
}

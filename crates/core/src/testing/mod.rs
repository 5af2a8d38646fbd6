//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the remote source and the
//! cache store, allowing repository and controller tests to run without
//! network or disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use gamedex_core::testing::{fixtures, MockRemoteCatalog};
//!
//! let remote = MockRemoteCatalog::new();
//! remote.set_home_page(vec![fixtures::game(1, "Portal 2", 4.6)]).await;
//! remote.set_offline(true).await;
//! ```

mod mock_remote;
mod mock_store;

pub use mock_remote::{MockRemoteCatalog, RecordedRemoteCall};
pub use mock_store::{MockCatalogStore, RecordedStoreCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::remote::{
        Clip, ClipQualities, Game, GameMovie, GamesPage, Genre, MovieData, Platform,
        PlatformWrapper, Screenshot,
    };

    /// Create a test game with reasonable defaults.
    pub fn game(id: i64, name: &str, rating: f64) -> Game {
        Game {
            id,
            name: name.to_string(),
            image_url: Some(format!("https://media.example/games/{}.jpg", id)),
            rating,
            release_date: Some("2022-02-25".to_string()),
            description: None,
            description_raw: Some(format!("A game called {}.", name)),
            genres: Some(vec![genre(4, "Action")]),
            platforms: Some(vec![platform_wrapper(4, "PC")]),
            metacritic_score: Some(80),
            clip: None,
            short_screenshots: None,
        }
    }

    /// Create a test game with an explicit release date.
    pub fn game_with_release(id: i64, name: &str, rating: f64, released: &str) -> Game {
        let mut g = game(id, name, rating);
        g.release_date = Some(released.to_string());
        g
    }

    /// Create a test game carrying an inline clip.
    pub fn game_with_clip(id: i64, name: &str, full: Option<&str>, direct: Option<&str>) -> Game {
        let mut g = game(id, name, 4.0);
        g.clip = Some(Clip {
            clip: direct.map(str::to_string),
            clips: Some(ClipQualities {
                q320: None,
                q640: None,
                full: full.map(str::to_string),
            }),
            video: None,
            preview: None,
        });
        g
    }

    /// Create a test genre.
    pub fn genre(id: i64, name: &str) -> Genre {
        Genre {
            id,
            name: name.to_string(),
        }
    }

    /// Create a test platform wrapper.
    pub fn platform_wrapper(id: i64, name: &str) -> PlatformWrapper {
        PlatformWrapper {
            platform: Platform {
                id,
                name: name.to_string(),
            },
        }
    }

    /// Create a test screenshot.
    pub fn screenshot(id: i64) -> Screenshot {
        Screenshot {
            id,
            image: format!("https://media.example/screenshots/{}.jpg", id),
        }
    }

    /// Create a test movie with the given quality variants.
    pub fn movie(id: i64, max: Option<&str>, q480: Option<&str>) -> GameMovie {
        GameMovie {
            id,
            data: MovieData {
                max: max.map(str::to_string),
                q480: q480.map(str::to_string),
            },
        }
    }

    /// Wrap games in a one-page listing.
    pub fn page(games: Vec<Game>) -> GamesPage {
        GamesPage {
            count: games.len() as i64,
            games,
        }
    }

    /// A run of `count` games with ids starting at `first_id`.
    pub fn numbered_games(first_id: i64, count: usize) -> Vec<Game> {
        (0..count as i64)
            .map(|i| game(first_id + i, &format!("Game {}", first_id + i), 4.0))
            .collect()
    }
}

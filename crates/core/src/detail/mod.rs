//! Game detail assembly.
//!
//! Fetches a game's details, screenshots and trailers in parallel (the
//! three are independent) and projects them into a display-ready shape.

use serde::{Deserialize, Serialize};

use crate::remote::{Game, GameMovie, Screenshot};
use crate::repository::GameRepository;

const NO_GENRES: &str = "No genres available";
const NO_PLATFORMS: &str = "No platforms available";
const NO_RELEASE_DATE: &str = "Release date unknown";
const PLATFORMS_SHOWN: usize = 5;

/// State of a game detail view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DetailUiState {
    Loading,
    Success(GameDetail),
    Error { message: String },
}

/// A game plus its display projections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDetail {
    pub game: Game,
    pub genres_text: String,
    pub platforms_text: String,
    pub release_date_formatted: String,
    /// Screenshot image URLs, catalog order.
    pub screenshots: Vec<String>,
    /// Preferred playable trailer URL, if any exists.
    pub trailer_url: Option<String>,
}

/// Load a detail view for the given game id.
///
/// Details, screenshots and movies are fetched concurrently; none of them
/// mutate shared state until all three complete. An absent game (remote
/// miss with nothing cached) is an error state, not an empty success.
pub async fn load_game_detail(repository: &GameRepository, id: i64) -> DetailUiState {
    let (game, screenshots, movies) = futures::join!(
        repository.game_details(id),
        repository.game_screenshots(id),
        repository.game_movies(id),
    );

    match game {
        Some(game) => DetailUiState::Success(assemble(game, screenshots, movies)),
        None => DetailUiState::Error {
            message: "Game not found".to_string(),
        },
    }
}

fn assemble(game: Game, screenshots: Vec<Screenshot>, movies: Vec<GameMovie>) -> GameDetail {
    let trailer_url = resolve_trailer(&game, &movies);
    GameDetail {
        genres_text: format_genres(&game.genre_names()),
        platforms_text: format_platforms(&game.platform_names()),
        release_date_formatted: format_release_date(game.release_date.as_deref()),
        screenshots: screenshots.into_iter().map(|s| s.image).collect(),
        trailer_url,
        game,
    }
}

/// The dedicated movies listing wins; the inline clip is the fallback.
fn resolve_trailer(game: &Game, movies: &[GameMovie]) -> Option<String> {
    if let Some(url) = movies.first().and_then(GameMovie::best_url) {
        return Some(url.to_string());
    }
    game.clip
        .as_ref()
        .and_then(|clip| clip.best_url())
        .map(str::to_string)
}

fn format_genres(genres: &[&str]) -> String {
    if genres.is_empty() {
        NO_GENRES.to_string()
    } else {
        genres.join(", ")
    }
}

fn format_platforms(platforms: &[&str]) -> String {
    if platforms.is_empty() {
        return NO_PLATFORMS.to_string();
    }
    let shown = platforms[..platforms.len().min(PLATFORMS_SHOWN)].join(", ");
    if platforms.len() > PLATFORMS_SHOWN {
        format!("{} and more", shown)
    } else {
        shown
    }
}

fn format_release_date(release_date: Option<&str>) -> String {
    release_date.unwrap_or(NO_RELEASE_DATE).to_string()
}

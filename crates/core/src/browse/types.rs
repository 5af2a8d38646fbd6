//! Observable browse state and its display projections.

use serde::{Deserialize, Serialize};

use crate::remote::{Game, Genre};

/// The single observable value a browse session exposes.
///
/// A tagged union so the presentation boundary can match exhaustively;
/// serialized as `{"type": "loading" | "success" | "error", ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrowseUiState {
    Loading,
    Success(BrowseSnapshot),
    Error { message: String },
}

impl BrowseUiState {
    pub fn is_success(&self) -> bool {
        matches!(self, BrowseUiState::Success(_))
    }

    pub fn snapshot(&self) -> Option<&BrowseSnapshot> {
        match self {
            BrowseUiState::Success(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// An immutable projection of the browse state.
///
/// Handed out by value; the controller's internal accumulator is never
/// shared by reference with the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseSnapshot {
    /// All accumulated games, in arrival order.
    pub games: Vec<Game>,
    /// The working set: the accumulated list narrowed by the active search.
    pub filtered_games: Vec<Game>,
    /// Games rated 4.5 or higher, existing order, first 5.
    pub featured: Vec<Game>,
    /// Working set by release date descending, first 10.
    pub new_releases: Vec<Game>,
    /// Working set by rating descending, first 10.
    pub top_rated: Vec<Game>,
    /// First 8 of the working set in existing order.
    pub popular: Vec<Game>,
    /// Genre reference list.
    pub genres: Vec<Genre>,
    /// Active search text (empty when not searching).
    pub search_query: String,
    /// Active genre filter.
    pub selected_genre: Option<i64>,
    /// Current page cursor.
    pub current_page: u32,
    /// Whether another page may exist.
    pub has_more_pages: bool,
    /// Whether a genre change or next-page fetch is in flight.
    pub is_loading_more: bool,
    /// True iff the working set is empty.
    pub is_empty: bool,
}

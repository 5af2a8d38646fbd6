//! Types for the remote game catalog (RAWG-style API wire shapes).
//!
//! These are also the domain shapes shared by the store, repository and
//! browse layers; the original catalog ids are the identity keys.

use serde::{Deserialize, Serialize};

/// A catalog game entry.
///
/// List responses carry a subset of the fields; the detail endpoint fills
/// in descriptions, platforms and the inline clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Stable identity from the remote catalog.
    pub id: i64,
    /// Display title.
    pub name: String,
    /// Cover image URL.
    #[serde(rename = "background_image")]
    pub image_url: Option<String>,
    /// Average rating, 0.0-5.0.
    #[serde(default)]
    pub rating: f64,
    /// Free-form ISO-like date string ("2024-01-15").
    #[serde(rename = "released")]
    pub release_date: Option<String>,
    /// HTML description (detail endpoint only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Plain-text description (detail endpoint only).
    #[serde(default, rename = "description_raw", skip_serializing_if = "Option::is_none")]
    pub description_raw: Option<String>,
    /// Genres, in catalog order.
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
    /// Platforms, in catalog order.
    #[serde(default)]
    pub platforms: Option<Vec<PlatformWrapper>>,
    /// Metacritic score, 0-100.
    #[serde(default, rename = "metacritic", skip_serializing_if = "Option::is_none")]
    pub metacritic_score: Option<i64>,
    /// Inline trailer clip, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<Clip>,
    /// Thumbnail screenshots embedded in list responses.
    #[serde(default, rename = "short_screenshots", skip_serializing_if = "Option::is_none")]
    pub short_screenshots: Option<Vec<Screenshot>>,
}

impl Game {
    /// Case-insensitive substring match against the title.
    pub fn matches_query(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }

    /// Genre names in catalog order.
    pub fn genre_names(&self) -> Vec<&str> {
        self.genres
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|g| g.name.as_str())
            .collect()
    }

    /// Platform names in catalog order.
    pub fn platform_names(&self) -> Vec<&str> {
        self.platforms
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|p| p.platform.name.as_str())
            .collect()
    }
}

/// A game genre. Near-static reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// A platform the game runs on. Embedded in [`Game`], not independently cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: i64,
    pub name: String,
}

/// The catalog nests platforms one level deep: `{"platform": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformWrapper {
    pub platform: Platform,
}

/// A game screenshot. Always fetched fresh, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
    pub id: i64,
    pub image: String,
}

/// Inline trailer clip attached to a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    /// Direct playable URL.
    #[serde(default)]
    pub clip: Option<String>,
    /// Quality-keyed variants.
    #[serde(default)]
    pub clips: Option<ClipQualities>,
    /// Source video URL.
    #[serde(default)]
    pub video: Option<String>,
    /// Preview image URL.
    #[serde(default)]
    pub preview: Option<String>,
}

impl Clip {
    /// Best playable URL in descending quality preference.
    pub fn best_url(&self) -> Option<&str> {
        if let Some(qualities) = &self.clips {
            if let Some(url) = qualities.best_url() {
                return Some(url);
            }
        }
        self.clip.as_deref()
    }
}

/// Quality variants of an inline clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipQualities {
    #[serde(rename = "320")]
    pub q320: Option<String>,
    #[serde(rename = "640")]
    pub q640: Option<String>,
    pub full: Option<String>,
}

impl ClipQualities {
    /// Highest available quality first.
    pub fn best_url(&self) -> Option<&str> {
        self.full
            .as_deref()
            .or(self.q640.as_deref())
            .or(self.q320.as_deref())
    }
}

/// A trailer from the dedicated movies listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMovie {
    pub id: i64,
    pub data: MovieData,
}

impl GameMovie {
    /// Max-quality URL, falling back to the standard-quality variant.
    pub fn best_url(&self) -> Option<&str> {
        self.data.max.as_deref().or(self.data.q480.as_deref())
    }
}

/// Quality variants of a trailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieData {
    pub max: Option<String>,
    #[serde(rename = "480")]
    pub q480: Option<String>,
}

/// One page of a games listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamesPage {
    /// Total result count reported by the catalog.
    pub count: i64,
    /// Games on this page, in catalog order.
    #[serde(rename = "results")]
    pub games: Vec<Game>,
}

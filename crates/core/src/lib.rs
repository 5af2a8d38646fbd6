pub mod browse;
pub mod config;
pub mod detail;
pub mod metrics;
pub mod remote;
pub mod repository;
pub mod store;
pub mod testing;

pub use browse::{BrowseController, BrowseSnapshot, BrowseUiState};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    SanitizedConfig, ServerConfig,
};
pub use detail::{load_game_detail, DetailUiState, GameDetail};
pub use remote::{
    Clip, ClipQualities, Game, GameMovie, GamesPage, Genre, MovieData, Platform, PlatformWrapper,
    RawgClient, RawgConfig, RemoteCatalogError, RemoteCatalogSource, Screenshot,
};
pub use repository::GameRepository;
pub use store::{CacheStats, CatalogStore, SqliteCatalogStore, StoreError};

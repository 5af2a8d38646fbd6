//! SQLite-backed catalog cache implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{CacheStats, CatalogStore, StoreError};
use crate::remote::{Game, Genre, PlatformWrapper};

/// SQLite-backed catalog cache.
///
/// The connection lives behind a mutex, so every trait call is atomic with
/// respect to concurrent readers; batch writes additionally run in a
/// transaction.
pub struct SqliteCatalogStore {
    conn: Mutex<Connection>,
}

impl SqliteCatalogStore {
    /// Open the cache database, creating the file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            -- Cached games (one row per catalog id, replaced wholesale on rewrite)
            CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                image_url TEXT,
                rating REAL NOT NULL DEFAULT 0,
                release_date TEXT,
                description TEXT,
                description_raw TEXT,
                genres TEXT,
                platforms TEXT,
                metacritic_score INTEGER,
                cached_at TEXT NOT NULL,
                seq INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_games_recency ON games(cached_at DESC, seq);

            -- Cached genres
            CREATE TABLE IF NOT EXISTS genres (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                cached_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_genres_name ON genres(name);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// Upsert one game row. `now_str` is shared across a batch so the whole
    /// batch sorts as one write; `seq` breaks ties in batch order.
    fn upsert_game_row(conn: &Connection, game: &Game, now_str: &str) -> Result<(), StoreError> {
        let genres_json = game
            .genres
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let platforms_json = game
            .platforms
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        conn.execute(
            "INSERT INTO games (id, name, image_url, rating, release_date, description,
                                description_raw, genres, platforms, metacritic_score,
                                cached_at, seq)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                     (SELECT COALESCE(MAX(seq), 0) + 1 FROM games))
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                image_url = excluded.image_url,
                rating = excluded.rating,
                release_date = excluded.release_date,
                description = excluded.description,
                description_raw = excluded.description_raw,
                genres = excluded.genres,
                platforms = excluded.platforms,
                metacritic_score = excluded.metacritic_score,
                cached_at = excluded.cached_at,
                seq = excluded.seq",
            params![
                game.id,
                &game.name,
                &game.image_url,
                game.rating,
                &game.release_date,
                &game.description,
                &game.description_raw,
                &genres_json,
                &platforms_json,
                game.metacritic_score,
                now_str,
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_game(row: &rusqlite::Row) -> rusqlite::Result<Game> {
        let genres_json: Option<String> = row.get(7)?;
        let platforms_json: Option<String> = row.get(8)?;

        // A malformed blob means the row predates a schema change; treat the
        // nested lists as absent rather than failing the whole read.
        let genres: Option<Vec<Genre>> =
            genres_json.and_then(|s| serde_json::from_str(&s).ok());
        let platforms: Option<Vec<PlatformWrapper>> =
            platforms_json.and_then(|s| serde_json::from_str(&s).ok());

        Ok(Game {
            id: row.get(0)?,
            name: row.get(1)?,
            image_url: row.get(2)?,
            rating: row.get(3)?,
            release_date: row.get(4)?,
            description: row.get(5)?,
            description_raw: row.get(6)?,
            genres,
            platforms,
            metacritic_score: row.get(9)?,
            clip: None,
            short_screenshots: None,
        })
    }
}

const GAME_COLUMNS: &str = "id, name, image_url, rating, release_date, description, \
                            description_raw, genres, platforms, metacritic_score";

impl CatalogStore for SqliteCatalogStore {
    fn game(&self, id: i64) -> Result<Option<Game>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            &format!("SELECT {} FROM games WHERE id = ?", GAME_COLUMNS),
            params![id],
            Self::row_to_game,
        );

        match result {
            Ok(game) => Ok(Some(game)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e.to_string())),
        }
    }

    fn games_page(&self, limit: u32, offset: u32) -> Result<Vec<Game>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM games ORDER BY cached_at DESC, seq ASC LIMIT ? OFFSET ?",
                GAME_COLUMNS
            ))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit, offset], Self::row_to_game)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut games = Vec::new();
        for row in rows {
            games.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(games)
    }

    fn all_games(&self) -> Result<Vec<Game>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM games ORDER BY cached_at DESC, seq ASC",
                GAME_COLUMNS
            ))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_game)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut games = Vec::new();
        for row in rows {
            games.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(games)
    }

    fn put_game(&self, game: &Game) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        let now_str = Utc::now().to_rfc3339();
        Self::upsert_game_row(&conn, game, &now_str)
    }

    fn put_games(&self, games: &[Game]) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let now_str = Utc::now().to_rfc3339();

        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        for game in games {
            Self::upsert_game_row(&tx, game, &now_str)?;
        }
        tx.commit().map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn clear_games(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM games", [])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    fn count_games(&self) -> Result<u64, StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn genres(&self) -> Result<Vec<Genre>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare("SELECT id, name FROM genres ORDER BY name ASC")
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Genre {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut genres = Vec::new();
        for row in rows {
            genres.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(genres)
    }

    fn put_genres(&self, genres: &[Genre]) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let now_str = Utc::now().to_rfc3339();

        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        for genre in genres {
            tx.execute(
                "INSERT INTO genres (id, name, cached_at) VALUES (?, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    cached_at = excluded.cached_at",
                params![genre.id, &genre.name, &now_str],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        }
        tx.commit().map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn clear_genres(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM genres", [])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    fn count_genres(&self) -> Result<u64, StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM genres", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn stats(&self) -> Result<CacheStats, StoreError> {
        let conn = self.conn.lock().unwrap();

        let games: u64 = conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let genres: u64 = conn
            .query_row("SELECT COUNT(*) FROM genres", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let oldest_entry: Option<DateTime<Utc>> = conn
            .query_row(
                "SELECT MIN(cached_at) FROM (SELECT cached_at FROM games
                 UNION ALL SELECT cached_at FROM genres)",
                [],
                |row| {
                    let s: Option<String> = row.get(0)?;
                    Ok(s)
                },
            )
            .map_err(|e| StoreError::Database(e.to_string()))?
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let newest_entry: Option<DateTime<Utc>> = conn
            .query_row(
                "SELECT MAX(cached_at) FROM (SELECT cached_at FROM games
                 UNION ALL SELECT cached_at FROM genres)",
                [],
                |row| {
                    let s: Option<String> = row.get(0)?;
                    Ok(s)
                },
            )
            .map_err(|e| StoreError::Database(e.to_string()))?
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(CacheStats {
            games,
            genres,
            oldest_entry,
            newest_entry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::Platform;

    fn create_test_store() -> SqliteCatalogStore {
        SqliteCatalogStore::in_memory().unwrap()
    }

    fn create_test_game(id: i64, name: &str) -> Game {
        Game {
            id,
            name: name.to_string(),
            image_url: Some(format!("https://media.example/games/{}.jpg", id)),
            rating: 4.2,
            release_date: Some("2023-05-12".to_string()),
            description: None,
            description_raw: Some(format!("All about {}.", name)),
            genres: Some(vec![
                Genre {
                    id: 4,
                    name: "Action".to_string(),
                },
                Genre {
                    id: 51,
                    name: "Indie".to_string(),
                },
            ]),
            platforms: Some(vec![PlatformWrapper {
                platform: Platform {
                    id: 4,
                    name: "PC".to_string(),
                },
            }]),
            metacritic_score: Some(88),
            clip: None,
            short_screenshots: None,
        }
    }

    #[test]
    fn test_put_and_get_game() {
        let store = create_test_store();
        let game = create_test_game(42, "Hollow Knight");

        store.put_game(&game).unwrap();

        let cached = store.game(42).unwrap().unwrap();
        assert_eq!(cached.name, "Hollow Knight");
        assert_eq!(cached.genre_names(), vec!["Action", "Indie"]);
        assert_eq!(cached.platform_names(), vec!["PC"]);
        assert_eq!(cached.metacritic_score, Some(88));
    }

    #[test]
    fn test_get_missing_game_is_none() {
        let store = create_test_store();
        assert!(store.game(999).unwrap().is_none());
    }

    #[test]
    fn test_put_replaces_in_full() {
        let store = create_test_store();
        store.put_game(&create_test_game(1, "Old Name")).unwrap();

        let mut updated = create_test_game(1, "New Name");
        updated.genres = None;
        updated.metacritic_score = None;
        store.put_game(&updated).unwrap();

        assert_eq!(store.count_games().unwrap(), 1);
        let cached = store.game(1).unwrap().unwrap();
        assert_eq!(cached.name, "New Name");
        // Full replace: no field-level merge with the prior record.
        assert!(cached.genres.is_none());
        assert!(cached.metacritic_score.is_none());
    }

    #[test]
    fn test_put_games_preserves_batch_order() {
        let store = create_test_store();
        let batch: Vec<Game> = [(30, "Third"), (10, "First"), (20, "Second")]
            .iter()
            .map(|(id, name)| create_test_game(*id, name))
            .collect();

        store.put_games(&batch).unwrap();

        let names: Vec<String> = store
            .all_games()
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Third", "First", "Second"]);
    }

    #[test]
    fn test_games_page_most_recent_write_first() {
        let store = create_test_store();
        store.put_games(&[create_test_game(1, "Older")]).unwrap();
        store.put_games(&[create_test_game(2, "Newer")]).unwrap();

        let page = store.games_page(10, 0).unwrap();
        assert_eq!(page[0].name, "Newer");
        assert_eq!(page[1].name, "Older");
    }

    #[test]
    fn test_rewrite_moves_game_to_front() {
        let store = create_test_store();
        store
            .put_games(&[create_test_game(1, "A"), create_test_game(2, "B")])
            .unwrap();

        store.put_game(&create_test_game(1, "A again")).unwrap();

        let page = store.games_page(10, 0).unwrap();
        assert_eq!(page[0].name, "A again");
        assert_eq!(store.count_games().unwrap(), 2);
    }

    #[test]
    fn test_games_page_respects_limit_and_offset() {
        let store = create_test_store();
        let batch: Vec<Game> = (1..=5)
            .map(|i| create_test_game(i, &format!("Game {}", i)))
            .collect();
        store.put_games(&batch).unwrap();

        let page = store.games_page(2, 1).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "Game 2");
        assert_eq!(page[1].name, "Game 3");
    }

    #[test]
    fn test_genres_ordered_by_name() {
        let store = create_test_store();
        store
            .put_genres(&[
                Genre {
                    id: 2,
                    name: "Shooter".to_string(),
                },
                Genre {
                    id: 1,
                    name: "Action".to_string(),
                },
                Genre {
                    id: 3,
                    name: "Puzzle".to_string(),
                },
            ])
            .unwrap();

        let names: Vec<String> = store.genres().unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Action", "Puzzle", "Shooter"]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = create_test_store();
        store.put_games(&[create_test_game(1, "A")]).unwrap();
        store
            .put_genres(&[Genre {
                id: 1,
                name: "Action".to_string(),
            }])
            .unwrap();

        store.clear_games().unwrap();
        store.clear_genres().unwrap();
        assert_eq!(store.count_games().unwrap(), 0);
        assert_eq!(store.count_genres().unwrap(), 0);

        // A second clear on an already-empty cache is fine.
        store.clear_games().unwrap();
        store.clear_genres().unwrap();
        assert_eq!(store.count_games().unwrap(), 0);
        assert_eq!(store.count_genres().unwrap(), 0);
    }

    #[test]
    fn test_stats() {
        let store = create_test_store();

        let stats = store.stats().unwrap();
        assert_eq!(stats.games, 0);
        assert_eq!(stats.genres, 0);
        assert!(stats.oldest_entry.is_none());

        store
            .put_games(&[create_test_game(1, "A"), create_test_game(2, "B")])
            .unwrap();
        store
            .put_genres(&[Genre {
                id: 1,
                name: "Action".to_string(),
            }])
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.games, 2);
        assert_eq!(stats.genres, 1);
        assert!(stats.oldest_entry.is_some());
        assert!(stats.newest_entry.is_some());
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("cache.db");

        {
            let store = SqliteCatalogStore::new(&db_path).unwrap();
            store.put_games(&[create_test_game(7, "Celeste")]).unwrap();
        }

        let store = SqliteCatalogStore::new(&db_path).unwrap();
        let cached = store.game(7).unwrap().unwrap();
        assert_eq!(cached.name, "Celeste");
    }
}

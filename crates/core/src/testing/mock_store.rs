//! Mock catalog store for testing.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::remote::{Game, Genre};
use crate::store::{CacheStats, CatalogStore, StoreError};

/// A recorded store call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedStoreCall {
    Game { id: i64 },
    GamesPage { limit: u32, offset: u32 },
    AllGames,
    PutGame { id: i64 },
    PutGames { count: usize },
    ClearGames,
    CountGames,
    Genres,
    PutGenres { count: usize },
    ClearGenres,
    CountGenres,
    Stats,
}

/// One cached game with its write position, mirroring the SQLite ordering
/// (most recent write first, batch order within a batch).
#[derive(Debug, Clone)]
struct StoredGame {
    game: Game,
    batch: u64,
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    games: Vec<StoredGame>,
    genres: Vec<Genre>,
    batch_counter: u64,
    seq_counter: u64,
    first_write: Option<DateTime<Utc>>,
    last_write: Option<DateTime<Utc>>,
    calls: Vec<RecordedStoreCall>,
    fail_next_write: Option<String>,
}

/// In-memory mock implementation of the [`CatalogStore`] trait.
///
/// Records every call and supports one-shot write failure injection for
/// exercising the repository's fallback branches.
#[derive(Debug, Default)]
pub struct MockCatalogStore {
    inner: Mutex<Inner>,
}

impl MockCatalogStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls.
    pub fn recorded_calls(&self) -> Vec<RecordedStoreCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Clear recorded calls.
    pub fn clear_recorded(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    /// Make the next write operation fail with a database error.
    pub fn fail_next_write(&self, message: &str) {
        self.inner.lock().unwrap().fail_next_write = Some(message.to_string());
    }

    fn take_write_failure(inner: &mut Inner) -> Option<StoreError> {
        inner.fail_next_write.take().map(StoreError::Database)
    }

    fn upsert(inner: &mut Inner, game: &Game, batch: u64) {
        inner.games.retain(|stored| stored.game.id != game.id);
        inner.seq_counter += 1;
        let seq = inner.seq_counter;
        inner.games.push(StoredGame {
            game: game.clone(),
            batch,
            seq,
        });
        let now = Utc::now();
        inner.first_write.get_or_insert(now);
        inner.last_write = Some(now);
    }

    fn ordered_games(inner: &Inner) -> Vec<Game> {
        let mut stored: Vec<&StoredGame> = inner.games.iter().collect();
        stored.sort_by(|a, b| b.batch.cmp(&a.batch).then(a.seq.cmp(&b.seq)));
        stored.into_iter().map(|s| s.game.clone()).collect()
    }
}

impl CatalogStore for MockCatalogStore {
    fn game(&self, id: i64) -> Result<Option<Game>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedStoreCall::Game { id });
        Ok(inner
            .games
            .iter()
            .find(|stored| stored.game.id == id)
            .map(|stored| stored.game.clone()))
    }

    fn games_page(&self, limit: u32, offset: u32) -> Result<Vec<Game>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedStoreCall::GamesPage { limit, offset });
        Ok(Self::ordered_games(&inner)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    fn all_games(&self) -> Result<Vec<Game>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedStoreCall::AllGames);
        Ok(Self::ordered_games(&inner))
    }

    fn put_game(&self, game: &Game) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedStoreCall::PutGame { id: game.id });
        if let Some(err) = Self::take_write_failure(&mut inner) {
            return Err(err);
        }
        inner.batch_counter += 1;
        let batch = inner.batch_counter;
        Self::upsert(&mut inner, game, batch);
        Ok(())
    }

    fn put_games(&self, games: &[Game]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .calls
            .push(RecordedStoreCall::PutGames { count: games.len() });
        if let Some(err) = Self::take_write_failure(&mut inner) {
            return Err(err);
        }
        inner.batch_counter += 1;
        let batch = inner.batch_counter;
        for game in games {
            Self::upsert(&mut inner, game, batch);
        }
        Ok(())
    }

    fn clear_games(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedStoreCall::ClearGames);
        inner.games.clear();
        Ok(())
    }

    fn count_games(&self) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedStoreCall::CountGames);
        Ok(inner.games.len() as u64)
    }

    fn genres(&self) -> Result<Vec<Genre>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedStoreCall::Genres);
        let mut genres = inner.genres.clone();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    fn put_genres(&self, genres: &[Genre]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .calls
            .push(RecordedStoreCall::PutGenres { count: genres.len() });
        if let Some(err) = Self::take_write_failure(&mut inner) {
            return Err(err);
        }
        for genre in genres {
            inner.genres.retain(|g| g.id != genre.id);
            inner.genres.push(genre.clone());
        }
        let now = Utc::now();
        inner.first_write.get_or_insert(now);
        inner.last_write = Some(now);
        Ok(())
    }

    fn clear_genres(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedStoreCall::ClearGenres);
        inner.genres.clear();
        Ok(())
    }

    fn count_genres(&self) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedStoreCall::CountGenres);
        Ok(inner.genres.len() as u64)
    }

    fn stats(&self) -> Result<CacheStats, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedStoreCall::Stats);
        Ok(CacheStats {
            games: inner.games.len() as u64,
            genres: inner.genres.len() as u64,
            oldest_entry: inner.first_write,
            newest_entry: inner.last_write,
        })
    }
}

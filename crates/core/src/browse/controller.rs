//! Browse session controller.
//!
//! Owns the accumulated game list and the paging/filter/search cursors,
//! drives the repository, and publishes an observable [`BrowseUiState`]
//! through a watch channel. Operations are serialized by an internal
//! mutex; they are meant to run one at a time per session.

use std::cmp::Ordering;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::debug;

use super::types::{BrowseSnapshot, BrowseUiState};
use crate::remote::{Game, Genre};
use crate::repository::GameRepository;

/// Page size the remote catalog serves; a shorter page ends pagination.
const PAGE_SIZE: usize = 20;

/// Rating threshold for the featured shelf.
const FEATURED_MIN_RATING: f64 = 4.5;
const FEATURED_LIMIT: usize = 5;
const NEW_RELEASES_LIMIT: usize = 10;
const TOP_RATED_LIMIT: usize = 10;
const POPULAR_LIMIT: usize = 8;

/// Controller for one browse session.
pub struct BrowseController {
    repository: Arc<GameRepository>,
    inner: Mutex<BrowseState>,
    tx: watch::Sender<BrowseUiState>,
}

/// Mutable accumulator owned exclusively by the controller. Observers only
/// ever see [`BrowseSnapshot`] copies.
#[derive(Debug, Default)]
struct BrowseState {
    games: Vec<Game>,
    genres: Vec<Genre>,
    search_query: String,
    selected_genre: Option<i64>,
    current_page: u32,
    is_last_page: bool,
    is_loading_more: bool,
}

impl BrowseController {
    pub fn new(repository: Arc<GameRepository>) -> Self {
        let (tx, _) = watch::channel(BrowseUiState::Loading);
        Self {
            repository,
            inner: Mutex::new(BrowseState::default()),
            tx,
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<BrowseUiState> {
        self.tx.subscribe()
    }

    /// The latest published state.
    pub fn current(&self) -> BrowseUiState {
        self.tx.borrow().clone()
    }

    /// Load genres and the first unfiltered page, replacing any prior state.
    pub async fn load_initial(&self) {
        let mut state = self.inner.lock().await;
        self.tx.send_replace(BrowseUiState::Loading);

        let genres = self.repository.genres().await;
        let games = self.repository.games(1, None, None).await;

        debug!("Initial load: {} games, {} genres", games.len(), genres.len());

        state.genres = genres;
        state.is_last_page = games.len() < PAGE_SIZE;
        state.games = games;
        state.current_page = 1;
        state.selected_genre = None;
        state.search_query.clear();
        state.is_loading_more = false;

        self.tx.send_replace(BrowseUiState::Success(state.snapshot()));
    }

    /// Re-run the initial load after an error or an empty offline start.
    pub async fn retry(&self) {
        self.load_initial().await;
    }

    /// Narrow the working set by a case-insensitive title match.
    ///
    /// Purely a local-state operation: no repository call is made, and an
    /// empty query restores the full accumulated list.
    pub async fn set_search_query(&self, query: &str) {
        let mut state = self.inner.lock().await;
        if !self.tx.borrow().is_success() {
            return;
        }

        state.search_query = query.to_string();
        self.tx.send_replace(BrowseUiState::Success(state.snapshot()));
    }

    /// Switch the genre filter and refetch page 1 for it.
    ///
    /// The accumulated list is discarded and replaced by the fetch result;
    /// `None` selects the unfiltered catalog again.
    pub async fn select_genre(&self, genre_id: Option<i64>) {
        let mut state = self.inner.lock().await;
        if !self.tx.borrow().is_success() {
            return;
        }

        state.is_loading_more = true;
        self.tx.send_replace(BrowseUiState::Success(state.snapshot()));

        let games = self.repository.games(1, genre_id, None).await;

        state.selected_genre = genre_id;
        state.current_page = 1;
        state.is_last_page = games.len() < PAGE_SIZE;
        state.games = games;
        state.is_loading_more = false;

        self.tx.send_replace(BrowseUiState::Success(state.snapshot()));
    }

    /// Fetch the next page for the current genre and append it.
    ///
    /// A no-op while another fetch is pending or once the end of the
    /// catalog was reached. The page cursor only advances on a non-empty
    /// result, so a failed fetch retries the same page number.
    pub async fn load_next_page(&self) {
        // A pending operation holds the state lock; re-entry is a no-op
        // rather than a queued duplicate fetch.
        let Ok(mut state) = self.inner.try_lock() else {
            return;
        };
        if !self.tx.borrow().is_success() || state.is_last_page {
            return;
        }

        state.is_loading_more = true;
        self.tx.send_replace(BrowseUiState::Success(state.snapshot()));

        let next_page = state.current_page + 1;
        let new_games = self
            .repository
            .games(next_page, state.selected_genre, None)
            .await;

        if new_games.is_empty() {
            state.is_last_page = true;
        } else {
            state.is_last_page = new_games.len() < PAGE_SIZE;
            state.games.extend(new_games);
            state.current_page = next_page;
        }
        state.is_loading_more = false;

        self.tx.send_replace(BrowseUiState::Success(state.snapshot()));
    }
}

impl BrowseState {
    /// Project the accumulator into an immutable snapshot, recomputing the
    /// derived slices over the current working set.
    fn snapshot(&self) -> BrowseSnapshot {
        let filtered: Vec<Game> = if self.search_query.is_empty() {
            self.games.clone()
        } else {
            self.games
                .iter()
                .filter(|g| g.matches_query(&self.search_query))
                .cloned()
                .collect()
        };

        let featured: Vec<Game> = filtered
            .iter()
            .filter(|g| g.rating >= FEATURED_MIN_RATING)
            .take(FEATURED_LIMIT)
            .cloned()
            .collect();

        // Lexicographic on the raw date string, not calendar-aware; absent
        // dates sort last. Stable, so ties keep their arrival order.
        let mut new_releases = filtered.clone();
        new_releases.sort_by(|a, b| b.release_date.cmp(&a.release_date));
        new_releases.truncate(NEW_RELEASES_LIMIT);

        let mut top_rated = filtered.clone();
        top_rated.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
        top_rated.truncate(TOP_RATED_LIMIT);

        let popular: Vec<Game> = filtered.iter().take(POPULAR_LIMIT).cloned().collect();

        BrowseSnapshot {
            games: self.games.clone(),
            is_empty: filtered.is_empty(),
            featured,
            new_releases,
            top_rated,
            popular,
            filtered_games: filtered,
            genres: self.genres.clone(),
            search_query: self.search_query.clone(),
            selected_genre: self.selected_genre,
            current_page: self.current_page,
            has_more_pages: !self.is_last_page,
            is_loading_more: self.is_loading_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::store::{CatalogStore, SqliteCatalogStore};
    use crate::testing::{fixtures, MockRemoteCatalog, RecordedRemoteCall};

    fn controller_over(remote: Arc<MockRemoteCatalog>) -> BrowseController {
        let store = Arc::new(SqliteCatalogStore::in_memory().unwrap());
        let repository = Arc::new(crate::repository::GameRepository::new(
            remote,
            store as Arc<dyn CatalogStore>,
        ));
        BrowseController::new(repository)
    }

    fn list_games_calls(calls: &[RecordedRemoteCall]) -> Vec<&RecordedRemoteCall> {
        calls
            .iter()
            .filter(|c| matches!(c, RecordedRemoteCall::ListGames { .. }))
            .collect()
    }

    #[tokio::test]
    async fn test_load_initial_publishes_success() {
        let remote = Arc::new(MockRemoteCatalog::new());
        remote.set_home_page(fixtures::numbered_games(1, 20)).await;
        remote.set_genres(vec![fixtures::genre(4, "Action")]).await;

        let controller = controller_over(Arc::clone(&remote));
        controller.load_initial().await;

        let state = controller.current();
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.games.len(), 20);
        assert_eq!(snapshot.genres.len(), 1);
        assert_eq!(snapshot.current_page, 1);
        assert!(snapshot.has_more_pages);
        assert!(!snapshot.is_empty);
    }

    #[tokio::test]
    async fn test_short_first_page_ends_pagination() {
        let remote = Arc::new(MockRemoteCatalog::new());
        remote.set_home_page(fixtures::numbered_games(1, 7)).await;

        let controller = controller_over(remote);
        controller.load_initial().await;

        let state = controller.current();
        assert!(!state.snapshot().unwrap().has_more_pages);
    }

    #[tokio::test]
    async fn test_featured_and_top_rated_slices() {
        let ratings = [4.8, 3.1, 4.6, 2.0, 4.5, 4.9, 1.5, 4.7, 3.9, 4.6];
        let games: Vec<_> = ratings
            .iter()
            .enumerate()
            .map(|(i, r)| fixtures::game(i as i64 + 1, &format!("Game {}", i + 1), *r))
            .collect();

        let remote = Arc::new(MockRemoteCatalog::new());
        remote.set_home_page(games).await;

        let controller = controller_over(remote);
        controller.load_initial().await;

        let state = controller.current();
        let snapshot = state.snapshot().unwrap();

        // Featured: rating >= 4.5 in arrival order, capped at 5.
        let featured: Vec<i64> = snapshot.featured.iter().map(|g| g.id).collect();
        assert_eq!(featured, vec![1, 3, 5, 6, 8]);

        // Top rated: rating descending, ties keep arrival order.
        let top: Vec<i64> = snapshot.top_rated.iter().map(|g| g.id).collect();
        assert_eq!(top, vec![6, 1, 8, 3, 10, 5, 9, 2, 4, 7]);
    }

    #[tokio::test]
    async fn test_new_releases_sorted_by_date_descending() {
        let remote = Arc::new(MockRemoteCatalog::new());
        remote
            .set_home_page(vec![
                fixtures::game_with_release(1, "Oldest", 4.0, "2019-03-01"),
                fixtures::game_with_release(2, "Newest", 4.0, "2024-11-20"),
                fixtures::game_with_release(3, "Middle", 4.0, "2021-07-15"),
            ])
            .await;

        let controller = controller_over(remote);
        controller.load_initial().await;

        let state = controller.current();
        let releases: Vec<i64> = state
            .snapshot()
            .unwrap()
            .new_releases
            .iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(releases, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_popular_is_first_eight_in_order() {
        let remote = Arc::new(MockRemoteCatalog::new());
        remote.set_home_page(fixtures::numbered_games(1, 12)).await;

        let controller = controller_over(remote);
        controller.load_initial().await;

        let state = controller.current();
        let popular: Vec<i64> = state
            .snapshot()
            .unwrap()
            .popular
            .iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(popular, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[tokio::test]
    async fn test_search_filters_locally_without_repository_calls() {
        let remote = Arc::new(MockRemoteCatalog::new());
        let mut games = fixtures::numbered_games(1, 18);
        games.push(fixtures::game(100, "Super Mario Odyssey", 4.7));
        games.push(fixtures::game(101, "Mario Kart 8", 4.4));
        remote.set_home_page(games).await;

        let controller = controller_over(Arc::clone(&remote));
        controller.load_initial().await;
        let calls_before = remote.call_count().await;

        controller.set_search_query("mario").await;

        let state = controller.current();
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.filtered_games.len(), 2);
        assert_eq!(snapshot.games.len(), 20);
        assert!(!snapshot.is_empty);
        assert_eq!(remote.call_count().await, calls_before);
    }

    #[tokio::test]
    async fn test_clearing_search_restores_accumulated_list() {
        let remote = Arc::new(MockRemoteCatalog::new());
        remote.set_home_page(fixtures::numbered_games(1, 20)).await;

        let controller = controller_over(Arc::clone(&remote));
        controller.load_initial().await;
        let calls_before = remote.call_count().await;

        controller.set_search_query("game 7").await;
        let state = controller.current();
        assert_eq!(state.snapshot().unwrap().filtered_games.len(), 1);

        controller.set_search_query("").await;
        let state = controller.current();
        assert_eq!(state.snapshot().unwrap().filtered_games.len(), 20);
        // Restoring the full list is local too, never a refetch.
        assert_eq!(remote.call_count().await, calls_before);
    }

    #[tokio::test]
    async fn test_search_with_no_matches_is_empty() {
        let remote = Arc::new(MockRemoteCatalog::new());
        remote.set_home_page(fixtures::numbered_games(1, 5)).await;

        let controller = controller_over(remote);
        controller.load_initial().await;
        controller.set_search_query("zzzz").await;

        let state = controller.current();
        let snapshot = state.snapshot().unwrap();
        assert!(snapshot.is_empty);
        assert!(snapshot.filtered_games.is_empty());
        assert!(snapshot.featured.is_empty());
    }

    #[tokio::test]
    async fn test_select_genre_replaces_accumulated_list() {
        let remote = Arc::new(MockRemoteCatalog::new());
        remote.set_home_page(fixtures::numbered_games(1, 20)).await;
        remote
            .set_games_page(
                1,
                Some(4),
                None,
                fixtures::page(vec![fixtures::game(500, "Doom Eternal", 4.4)]),
            )
            .await;

        let controller = controller_over(Arc::clone(&remote));
        controller.load_initial().await;
        controller.select_genre(Some(4)).await;

        let state = controller.current();
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.games.len(), 1);
        assert_eq!(snapshot.games[0].name, "Doom Eternal");
        assert_eq!(snapshot.selected_genre, Some(4));
        assert_eq!(snapshot.current_page, 1);
        assert!(!snapshot.has_more_pages);
        assert!(!snapshot.is_loading_more);
    }

    #[tokio::test]
    async fn test_load_next_page_appends_and_advances() {
        let remote = Arc::new(MockRemoteCatalog::new());
        remote.set_home_page(fixtures::numbered_games(1, 20)).await;
        remote
            .set_games_page(2, None, None, fixtures::page(fixtures::numbered_games(21, 5)))
            .await;

        let controller = controller_over(Arc::clone(&remote));
        controller.load_initial().await;
        controller.load_next_page().await;

        let state = controller.current();
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.games.len(), 25);
        assert_eq!(snapshot.current_page, 2);
        // Second page was short, so pagination ended.
        assert!(!snapshot.has_more_pages);
    }

    #[tokio::test]
    async fn test_empty_next_page_marks_end_without_change() {
        let remote = Arc::new(MockRemoteCatalog::new());
        remote.set_home_page(fixtures::numbered_games(1, 20)).await;
        remote
            .set_games_page(2, None, None, fixtures::page(vec![]))
            .await;

        let controller = controller_over(Arc::clone(&remote));
        controller.load_initial().await;
        controller.load_next_page().await;

        let state = controller.current();
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.games.len(), 20);
        assert_eq!(snapshot.current_page, 1);
        assert!(!snapshot.has_more_pages);
    }

    #[tokio::test]
    async fn test_load_next_page_noop_after_end() {
        let remote = Arc::new(MockRemoteCatalog::new());
        remote.set_home_page(fixtures::numbered_games(1, 5)).await;

        let controller = controller_over(Arc::clone(&remote));
        controller.load_initial().await;
        let calls_before = remote.call_count().await;

        controller.load_next_page().await;
        assert_eq!(remote.call_count().await, calls_before);
    }

    #[tokio::test]
    async fn test_load_next_page_noop_while_fetch_pending() {
        let remote = Arc::new(MockRemoteCatalog::new());
        remote.set_home_page(fixtures::numbered_games(1, 20)).await;
        remote
            .set_games_page(2, None, None, fixtures::page(fixtures::numbered_games(21, 20)))
            .await;

        let controller = Arc::new(controller_over(Arc::clone(&remote)));
        controller.load_initial().await;

        remote.set_delay(Duration::from_millis(50)).await;
        let first = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.load_next_page().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Re-entry while the first fetch is pending.
        controller.load_next_page().await;
        first.await.unwrap();

        let calls = remote.recorded_calls().await;
        let page_two_calls = list_games_calls(&calls)
            .into_iter()
            .filter(|c| matches!(c, RecordedRemoteCall::ListGames { page: 2, .. }))
            .count();
        assert_eq!(page_two_calls, 1);
    }

    #[tokio::test]
    async fn test_load_next_page_keeps_genre_filter() {
        let remote = Arc::new(MockRemoteCatalog::new());
        remote.set_home_page(fixtures::numbered_games(1, 20)).await;
        remote
            .set_games_page(1, Some(4), None, fixtures::page(fixtures::numbered_games(100, 20)))
            .await;
        remote
            .set_games_page(2, Some(4), None, fixtures::page(fixtures::numbered_games(200, 3)))
            .await;

        let controller = controller_over(Arc::clone(&remote));
        controller.load_initial().await;
        controller.select_genre(Some(4)).await;
        controller.load_next_page().await;

        let state = controller.current();
        assert_eq!(state.snapshot().unwrap().games.len(), 23);

        let calls = remote.recorded_calls().await;
        assert!(calls.contains(&RecordedRemoteCall::ListGames {
            page: 2,
            genre_id: Some(4),
            search: None,
        }));
    }

    #[tokio::test]
    async fn test_unreachable_next_page_keeps_accumulated_data() {
        let remote = Arc::new(MockRemoteCatalog::new());
        remote.set_home_page(fixtures::numbered_games(1, 20)).await;

        let controller = controller_over(Arc::clone(&remote));
        controller.load_initial().await;

        // Paged requests have no cache fallback, so an unreachable remote
        // resolves to an empty page: pagination ends, the accumulated list
        // and cursor stay put, the loading flag clears.
        remote.set_offline(true).await;
        controller.load_next_page().await;

        let state = controller.current();
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.games.len(), 20);
        assert_eq!(snapshot.current_page, 1);
        assert!(!snapshot.has_more_pages);
        assert!(!snapshot.is_loading_more);
    }

    #[tokio::test]
    async fn test_commands_before_initial_load_are_noops() {
        let remote = Arc::new(MockRemoteCatalog::new());
        let controller = controller_over(Arc::clone(&remote));

        controller.set_search_query("mario").await;
        controller.select_genre(Some(4)).await;
        controller.load_next_page().await;

        assert!(matches!(controller.current(), BrowseUiState::Loading));
        assert_eq!(remote.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_watch_subscribers_see_transitions() {
        let remote = Arc::new(MockRemoteCatalog::new());
        remote.set_home_page(fixtures::numbered_games(1, 3)).await;

        let controller = controller_over(remote);
        let mut rx = controller.subscribe();
        assert!(matches!(*rx.borrow(), BrowseUiState::Loading));

        controller.load_initial().await;
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_success());
    }
}

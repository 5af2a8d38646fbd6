use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use gamedex_core::{BrowseController, Config, GameRepository, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    repository: Arc<GameRepository>,
    /// Live browse sessions. Removing an entry tears the session down; an
    /// operation still in flight completes against an unreachable
    /// controller, so its result is never observed.
    sessions: RwLock<HashMap<Uuid, Arc<BrowseController>>>,
}

impl AppState {
    pub fn new(config: Config, repository: Arc<GameRepository>) -> Self {
        Self {
            config,
            repository,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn repository(&self) -> &Arc<GameRepository> {
        &self.repository
    }

    /// Create a new browse session.
    pub async fn create_session(&self) -> (Uuid, Arc<BrowseController>) {
        let id = Uuid::new_v4();
        let controller = Arc::new(BrowseController::new(Arc::clone(&self.repository)));
        self.sessions
            .write()
            .await
            .insert(id, Arc::clone(&controller));
        (id, controller)
    }

    /// Look up a live browse session.
    pub async fn session(&self, id: Uuid) -> Option<Arc<BrowseController>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Tear down a browse session. Returns false when it was not live.
    pub async fn remove_session(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }
}

//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock remote catalog injected, so the full HTTP surface can be
//! exercised without network access.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use gamedex_core::{
    testing::MockRemoteCatalog, CatalogStore, Config, DatabaseConfig, GameRepository, RawgConfig,
    RemoteCatalogSource, ServerConfig, SqliteCatalogStore,
};
use gamedex_server::{create_router, AppState};

/// Re-export fixtures for test convenience
pub use gamedex_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server over a real SQLite cache (temp file) and
/// a fully controllable [`MockRemoteCatalog`].
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock remote catalog - configure pages, details, outages
    pub remote: Arc<MockRemoteCatalog>,
    /// Temporary directory holding the cache database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub body_text: String,
}

impl TestFixture {
    /// Create a new test fixture with an empty cache and catalog.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let remote = Arc::new(MockRemoteCatalog::new());
        let store = Arc::new(SqliteCatalogStore::new(&db_path).expect("Failed to open cache"));

        let repository = Arc::new(GameRepository::new(
            Arc::clone(&remote) as Arc<dyn RemoteCatalogSource>,
            store as Arc<dyn CatalogStore>,
        ));

        let config = Config {
            remote: RawgConfig {
                api_key: "test-key".to_string(),
                base_url: None,
                page_size: 20,
                timeout_secs: 30,
            },
            server: ServerConfig {
                host: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
        };

        let state = Arc::new(AppState::new(config, repository));
        let router = create_router(state);

        Self {
            router,
            remote,
            temp_dir,
        }
    }

    /// Perform a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Perform a POST request with a JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Perform a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("DELETE")
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body_text = String::from_utf8_lossy(&bytes).to_string();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            body_text,
        }
    }
}

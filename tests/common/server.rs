//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own catalog and admin databases.

use super::constants::*;
use super::fixtures::{create_test_admin_db, create_test_catalog, CatalogFixture};
use music_catalog_server::server::{RequestsLoggingLevel, ServerConfig};
use music_catalog_server::{
    make_app, AdminStore, AuthGate, CatalogService, CatalogStore, ServerState, TokenCodec,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with isolated databases
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Ids of the seeded catalog records
    pub catalog: CatalogFixture,

    /// Direct store access, for asserting on what a request left behind
    pub catalog_store: Arc<dyn CatalogStore>,
    pub admin_store: Arc<dyn AdminStore>,

    // Private fields - keep resources alive until drop
    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server with registration enabled
    pub async fn spawn() -> Self {
        Self::spawn_with_registration(true).await
    }

    /// Spawns a new test server on a random port
    ///
    /// This function:
    /// 1. Creates a temporary catalog db with seeded records
    /// 2. Creates a temporary admin db with the test admin
    /// 3. Binds to a random port (127.0.0.1:0)
    /// 4. Spawns the server in a background task
    /// 5. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if database creation, port binding or startup fails, or if the
    /// server doesn't become ready within timeout.
    pub async fn spawn_with_registration(registration_enabled: bool) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let (catalog_store, catalog) = create_test_catalog(&temp_dir.path().join("catalog.db"))
            .expect("Failed to create test catalog");
        let catalog_store: Arc<dyn CatalogStore> = Arc::new(catalog_store);

        let admin_store = create_test_admin_db(&temp_dir.path().join("admin.db"))
            .expect("Failed to create test admin db");
        let admin_store: Arc<dyn AdminStore> = Arc::new(admin_store);

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            frontend_dir_path: None,
        };
        let auth_gate = AuthGate::new(
            admin_store.clone(),
            TokenCodec::new(TEST_JWT_SECRET.as_bytes(), TEST_TOKEN_TTL_SEC),
            registration_enabled,
        );
        let state = ServerState::new(
            config,
            CatalogService::new(catalog_store.clone()),
            auth_gate,
        );
        let app = make_app(state);

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            catalog,
            catalog_store,
            admin_store,
            _temp_dir: temp_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

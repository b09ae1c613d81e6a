//! Server test utilities.

use crate::common::fixtures::{FixedCalendar, text_request};
use axum::http::StatusCode;
use dayoff_core::config::{AppConfig, MetadataConfig};
use dayoff_metadata::{MetadataStore, SqliteStore};
use dayoff_server::bootstrap::ensure_root_user;
use dayoff_server::{AppState, create_router};
use std::sync::Arc;
use tempfile::TempDir;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    pub calendar: Arc<FixedCalendar>,
    pub root_token: String,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with a temporary database.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server with custom config modifications.
    pub async fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let db_path = temp_dir.path().join("data.db");
        let metadata: Arc<dyn MetadataStore> = Arc::new(
            SqliteStore::new(&db_path, None)
                .await
                .expect("Failed to create metadata store"),
        );

        let mut config = AppConfig::for_testing();
        config.metadata = MetadataConfig::Sqlite {
            path: db_path,
            busy_timeout_secs: None,
        };
        modifier(&mut config);

        let root = ensure_root_user(metadata.as_ref(), &config.root)
            .await
            .expect("Failed to create root user");
        let root_token = root
            .token
            .expect("Fresh database must yield a root token")
            .into_string();

        let calendar = Arc::new(FixedCalendar::new());
        let state = AppState::new(config, metadata, calendar.clone());
        let router = create_router(state.clone());

        Self {
            router,
            state,
            calendar,
            root_token,
            _temp_dir: temp_dir,
        }
    }

    /// Get access to the underlying metadata.
    pub fn metadata(&self) -> Arc<dyn MetadataStore> {
        self.state.metadata.clone()
    }

    /// Register a user through the API and return its token.
    pub async fn register(&self, username: &str) -> String {
        let uri = format!("/register/{username}?token={}", self.root_token);
        let (status, body) = text_request(&self.router, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::CREATED, "register {username}: {body}");
        body
    }
}

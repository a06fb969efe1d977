#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};
use tower::ServiceExt;

use dubsite_api::config::{AdminConfig, ServerConfig, StorageConfig};
use dubsite_api::invocation::InvocationResponse;
use dubsite_api::router::build_app_router;
use dubsite_api::state::AppState;
use dubsite_core::auth::SharedSecretAuthorizer;
use dubsite_core::upload::PreparedUpload;
use dubsite_db::ConnectionFactory;
use dubsite_storage::{StorageBackend, StorageError, UploadReceipt};

pub const ADMIN_PASSWORD: &str = "test-admin-secret";
pub const CDN_PREFIX: &str = "https://cdn.test/files";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused@127.0.0.1:1/unused".to_string(),
        request_timeout_secs: 30,
        admin: AdminConfig {
            password: ADMIN_PASSWORD.to_string(),
            allow_empty_password: false,
        },
        storage: StorageConfig {
            cdn_prefix: CDN_PREFIX.to_string(),
            ..StorageConfig::default()
        },
    }
}

// ---------------------------------------------------------------------------
// Storage fake
// ---------------------------------------------------------------------------

/// How [`RecordingStorage`] answers.
pub enum Reply {
    /// Succeed, reporting this url (or none).
    Url(Option<String>),
    /// Fail with this HTTP status.
    Fail(u16),
}

/// A storage backend that records every upload instead of sending it.
pub struct RecordingStorage {
    reply: Reply,
    uploads: Mutex<Vec<PreparedUpload>>,
}

impl RecordingStorage {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            uploads: Mutex::new(Vec::new()),
        })
    }

    pub fn uploads(&self) -> Vec<PreparedUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageBackend for RecordingStorage {
    async fn upload(&self, file: PreparedUpload) -> Result<UploadReceipt, StorageError> {
        self.uploads.lock().unwrap().push(file);
        match &self.reply {
            Reply::Url(url) => Ok(UploadReceipt { url: url.clone() }),
            Reply::Fail(status) => Err(StorageError::ApiError {
                status: *status,
                body: "storage unavailable".to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// State builders
// ---------------------------------------------------------------------------

/// State whose database is unreachable. Any handler path that opens a
/// connection fails with a 500, so tests using this prove the path never
/// touched the store.
pub fn offline_state(storage: Arc<RecordingStorage>) -> AppState {
    let unreachable = PgConnectOptions::new_without_pgpass()
        .host("127.0.0.1")
        .port(1)
        .username("nobody")
        .database("nothing");
    state_with(ConnectionFactory::from_options(unreachable), storage, test_config())
}

/// State backed by the per-test database created by `#[sqlx::test]`.
pub fn db_state(connect_opts: PgConnectOptions) -> AppState {
    state_with(
        ConnectionFactory::from_options(connect_opts),
        RecordingStorage::new(Reply::Url(None)),
        test_config(),
    )
}

pub fn state_with(
    connections: ConnectionFactory,
    storage: Arc<RecordingStorage>,
    config: ServerConfig,
) -> AppState {
    let authorizer = SharedSecretAuthorizer::new(config.admin.password.clone())
        .allow_empty_secret(config.admin.allow_empty_password);

    AppState {
        connections,
        authorizer: Arc::new(authorizer),
        storage,
        config: Arc::new(config),
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(state: AppState) -> Router {
    build_app_router(state)
}

// ---------------------------------------------------------------------------
// Assertions
// ---------------------------------------------------------------------------

/// Parse an invocation response body, panicking with the raw body on failure.
pub fn body_json(response: &InvocationResponse) -> serde_json::Value {
    response
        .json_body()
        .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", response.body))
}

/// Count rows in `table` through a fresh connection.
pub async fn count_rows(connect_opts: &PgConnectOptions, table: &str) -> i64 {
    let mut conn: PgConnection = connect_opts.connect().await.unwrap();
    let count: i64 = sqlx::query_scalar(&format!("SELECT count(*) FROM {table}"))
        .fetch_one(&mut conn)
        .await
        .unwrap();
    conn.close().await.unwrap();
    count
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Send a request through the router.
pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

/// Collect an HTTP response body as JSON.
pub async fn http_body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

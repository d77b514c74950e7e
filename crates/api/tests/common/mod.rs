#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use helpdesk_api::auth::jwt::{generate_unlock_token, JwtConfig};
use helpdesk_api::auth::password::hash_password;
use helpdesk_api::config::ServerConfig;
use helpdesk_api::router::build_app_router;
use helpdesk_api::state::AppState;
use helpdesk_api::storage::SignatureStore;

/// The shared password accepted by test apps.
pub const TEST_PASSWORD: &str = "test-unlock-password";

/// 16 bytes starting with the PNG signature, as a data URL.
pub const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUg==";

/// Hashing is slow in debug builds; do it once per test binary.
fn unlock_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_PASSWORD).expect("hashing should succeed"))
        .clone()
}

/// Build a test `ServerConfig` with safe defaults.
///
/// Ticket and staff signatures get sibling directories under `storage_dir`.
pub fn test_config(storage_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        signature_dir: storage_dir.join("tickets"),
        staff_signature_dir: storage_dir.join("staff"),
        unlock_password_hash: unlock_password_hash(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            unlock_token_expiry_mins: 60,
        },
    }
}

/// A router over temporary signature directories plus a valid unlock token.
pub struct TestApp {
    pub router: Router,
    pub token: String,
    pub storage_dir: TempDir,
}

impl TestApp {
    /// A fresh handle to the router; each request consumes one.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Served directory of ticket signatures.
    pub fn signature_dir(&self) -> PathBuf {
        self.storage_dir.path().join("tickets")
    }

    pub fn signature_path(&self, name: &str) -> PathBuf {
        self.signature_dir().join(name)
    }

    pub fn staff_signature_path(&self, staff_name: &str) -> PathBuf {
        self.storage_dir.path().join("staff").join(format!("{staff_name}.png"))
    }

    /// Names of the ticket signature files currently on disk.
    pub fn stored_signatures(&self) -> Vec<String> {
        match std::fs::read_dir(self.signature_dir()) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(pool: SqlitePool) -> TestApp {
    let storage_dir = tempfile::tempdir().expect("tempdir should be created");
    let config = test_config(storage_dir.path());
    let token = generate_unlock_token(&config.jwt).expect("token generation should succeed");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        signatures: Arc::new(SignatureStore::new(
            config.signature_dir.clone(),
            config.staff_signature_dir.clone(),
        )),
    };

    TestApp {
        router: build_app_router(state, &config),
        token,
        storage_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should complete")
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(t) => builder.header("Authorization", format!("Bearer {t}")),
        None => builder,
    }
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    builder(method, uri, token)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = builder(Method::GET, uri, None)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = builder(Method::GET, uri, Some(token))
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = builder(Method::POST, uri, Some(token))
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = builder(Method::DELETE, uri, Some(token))
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Body helpers
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Percent-encode a query or path value (URIs must be ASCII).
pub fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

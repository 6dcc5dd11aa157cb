//! Test helpers for the web integration tests.
//!
//! Builds the full router over an in-memory database, the bundled view
//! templates, and a fixed session key.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::header::LOCATION;
use axum_test::{TestResponse, TestServer};

use portier::auth::{session_key_from_bytes, SessionManager};
use portier::template::TemplateEngine;
use portier::web::{create_router, AppState};
use portier::{Database, UserRepository};

/// Session secret shared by the app under test and the helpers.
pub const TEST_SECRET: &[u8] = b"integration-test-secret-0123456789abcdef-0123456789";

/// Application under test.
pub struct TestApp {
    /// HTTP test client.
    pub server: TestServer,
    /// Backing database.
    pub db: Database,
    /// Session manager configured like the server's.
    pub sessions: Arc<SessionManager>,
}

/// Directory holding the bundled view templates.
pub fn templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

/// Directory holding the bundled static assets.
pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// Session manager using [`TEST_SECRET`].
pub fn test_sessions() -> SessionManager {
    SessionManager::with_key(session_key_from_bytes(TEST_SECRET).expect("test key"))
}

/// Spawn the app over a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    spawn_app_with_db(db)
}

/// Spawn the app over an existing database.
pub fn spawn_app_with_db(db: Database) -> TestApp {
    let views = TemplateEngine::load_dir(templates_dir()).expect("Failed to load templates");
    let sessions = Arc::new(test_sessions());

    let state = AppState::new(
        Arc::new(UserRepository::new(db.pool().clone())),
        Arc::clone(&sessions),
        Arc::new(views),
    );

    let router = create_router(state, static_dir());
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        db,
        sessions,
    }
}

/// Submit the registration form.
pub async fn register(
    server: &TestServer,
    fullname: &str,
    email: &str,
    password: &str,
) -> TestResponse {
    server
        .post("/register")
        .form(&[("fullname", fullname), ("email", email), ("password", password)])
        .await
}

/// Submit the login form.
pub async fn login(server: &TestServer, email: &str, password: &str) -> TestResponse {
    server
        .post("/")
        .form(&[("email", email), ("password", password)])
        .await
}

/// `Location` header of a redirect response.
pub fn location(response: &TestResponse) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

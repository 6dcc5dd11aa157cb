//! Router configuration for the web front end.

use std::path::Path;

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{login, login_form, logout, main_page, register, register_form, AppState};
use super::middleware::{require_session, security_headers};

/// Create the application router.
///
/// Routes under the session gate live in their own sub-router so that the
/// gate cannot be skipped by adding a route elsewhere.
pub fn create_router(state: AppState, static_path: impl AsRef<Path>) -> Router {
    let public_routes = Router::new()
        .route("/", get(login_form).post(login))
        .route("/register", get(register_form).post(register))
        .route("/logout", get(logout).post(logout));

    let protected_routes = Router::new()
        .route("/main", get(main_page))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/static", ServeDir::new(static_path.as_ref()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(state)
}

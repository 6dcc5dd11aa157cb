//! Page handlers for the web front end.

pub mod auth;
pub mod pages;

use std::sync::Arc;

use axum::response::Html;

use crate::auth::SessionManager;
use crate::db::CredentialStore;
use crate::template::{TemplateContext, ViewRenderer};
use crate::web::error::WebError;

pub use auth::*;
pub use pages::*;

/// Application state shared across handlers.
///
/// Every collaborator is injected here by `main` (or by tests).
#[derive(Clone)]
pub struct AppState {
    /// Credential store.
    pub users: Arc<dyn CredentialStore>,
    /// Session cookie manager.
    pub sessions: Arc<SessionManager>,
    /// View renderer.
    pub views: Arc<dyn ViewRenderer>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        users: Arc<dyn CredentialStore>,
        sessions: Arc<SessionManager>,
        views: Arc<dyn ViewRenderer>,
    ) -> Self {
        Self {
            users,
            sessions,
            views,
        }
    }

    /// Render a view into an HTML response.
    pub fn render(&self, view: &str, context: &TemplateContext) -> Result<Html<String>, WebError> {
        Ok(Html(self.views.render(view, context)?))
    }
}

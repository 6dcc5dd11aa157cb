//! Middleware for the web front end.

pub mod auth;
pub mod security;

pub use auth::{guard, require_session, AuthUser, LOGIN_PATH};
pub use security::security_headers;

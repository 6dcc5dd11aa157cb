//! Web front end for Portier.
//!
//! Server-rendered login, registration, and main pages, with the main page
//! behind the session gate.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::WebError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;

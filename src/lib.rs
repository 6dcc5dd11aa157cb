//! Portier - a session-authenticated web login service.
//!
//! Users register with a full name, email, and password, log in to receive an
//! encrypted session cookie, and reach a protected main page until they log
//! out or the session expires.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod template;
pub mod web;

pub use auth::{
    authenticate, hash_password, load_session_key, register, verify_password, Account,
    Credentials, LoginError, PasswordError, RegistrationError, RegistrationRequest, Session,
    SessionError, SessionManager, ValidationError,
};
pub use config::Config;
pub use db::{CredentialStore, Database, NewUser, StoreError, User, UserRepository};
pub use error::{PortierError, Result};

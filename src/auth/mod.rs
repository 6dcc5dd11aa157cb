//! Authentication module for Portier.
//!
//! This module provides password hashing, session management,
//! user registration, and credential checking.

mod login;
mod password;
mod registration;
mod session;
pub mod validation;

pub use login::{authenticate, Account, Credentials, LoginError};
pub use password::{hash_password, verify_dummy, verify_password, PasswordError};
pub use registration::{register, RegistrationError, RegistrationRequest};
pub use session::{
    load_session_key, session_key_from_bytes, Session, SessionError, SessionManager,
    SessionState, DEFAULT_SESSION_DURATION_SECS, MAX_SESSION_DURATION_SECS, MIN_KEY_LENGTH,
};
pub use validation::ValidationError;

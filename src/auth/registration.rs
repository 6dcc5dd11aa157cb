//! User registration for Portier.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::info;

use crate::auth::validation::{normalize_email, validate_registration, ValidationError};
use crate::auth::{hash_password, PasswordError};
use crate::db::{CredentialStore, NewUser, StoreError};

/// Registration-specific errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Validation failed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Email already registered.
    #[error("email already registered")]
    DuplicateIdentity,

    /// Password hashing failed.
    #[error("password error: {0}")]
    Hashing(#[from] PasswordError),

    /// Storage failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for RegistrationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateIdentity => RegistrationError::DuplicateIdentity,
            other => RegistrationError::Storage(other.to_string()),
        }
    }
}

/// Registration request data, as submitted by the form.
#[derive(Debug)]
pub struct RegistrationRequest {
    /// Display name.
    pub fullname: String,
    /// Email address (normalized by [`register`]).
    pub email: String,
    /// Plaintext password.
    pub password: SecretString,
}

impl RegistrationRequest {
    /// Create a new registration request.
    pub fn new(
        fullname: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            fullname: fullname.into(),
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Register a new user.
///
/// This function:
/// 1. Normalizes the email and trims the full name
/// 2. Validates all input fields
/// 3. Hashes the password on the blocking pool
/// 4. Inserts the user; the store rejects a duplicate email
///
/// Returns the new user's ID.
pub async fn register(
    store: &dyn CredentialStore,
    request: RegistrationRequest,
) -> Result<i64, RegistrationError> {
    let fullname = request.fullname.trim().to_string();
    let email = normalize_email(&request.email);

    validate_registration(&fullname, &email, request.password.expose_secret())?;

    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::HashError(e.to_string()))??;

    let id = store
        .create(&NewUser::new(fullname, email, password_hash))
        .await?;

    info!(user_id = id, "New user registered");

    Ok(id)
}

//! Credential checking for Portier logins.

use secrecy::SecretString;
use thiserror::Error;
use tracing::{info, warn};

use crate::auth::password::{verify_dummy, verify_password};
use crate::auth::validation::normalize_email;
use crate::db::{CredentialStore, StoreError};

/// Login errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// Unknown email or wrong password. The two are never told apart.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Storage failure.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Submitted login credentials.
#[derive(Debug)]
pub struct Credentials {
    /// Email address as typed.
    pub email: String,
    /// Plaintext password.
    pub password: SecretString,
}

impl Credentials {
    /// Create credentials from form input.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// An authenticated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// User ID.
    pub id: i64,
    /// Normalized email.
    pub email: String,
    /// Display name.
    pub fullname: String,
}

/// Check credentials against the store.
///
/// Password verification runs on the blocking pool. An unknown email still
/// pays for one verification so both failure paths take similar time.
pub async fn authenticate(
    store: &dyn CredentialStore,
    credentials: Credentials,
) -> Result<Account, LoginError> {
    let email = normalize_email(&credentials.email);
    let password = credentials.password;

    let user = match store.find_by_identity(&email).await {
        Ok(user) => Some(user),
        Err(StoreError::NotFound) => None,
        Err(e) => return Err(LoginError::Storage(e.to_string())),
    };

    let Some(user) = user else {
        let _ = tokio::task::spawn_blocking(move || verify_dummy(&password)).await;
        info!(reason = "invalid_credentials", "Login failed");
        return Err(LoginError::InvalidCredentials);
    };

    let hash = user.password.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&hash, &password))
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Password verification task failed");
            false
        });

    if !verified {
        info!(reason = "invalid_credentials", "Login failed");
        return Err(LoginError::InvalidCredentials);
    }

    info!(user_id = user.id, "User logged in");

    Ok(Account {
        id: user.id,
        email: user.email,
        fullname: user.fullname,
    })
}

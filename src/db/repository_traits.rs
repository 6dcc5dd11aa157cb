//! Credential store interface.
//!
//! Handlers and auth services depend on [`CredentialStore`] rather than on
//! the SQLite repository directly, so tests can swap in fakes.

use axum::async_trait;
use thiserror::Error;

use crate::db::{NewUser, User};

/// Credential store errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The identity (email) is already registered.
    #[error("identity already registered")]
    DuplicateIdentity,

    /// No user with the requested identity.
    #[error("user not found")]
    NotFound,

    /// Underlying storage failed (I/O, connection, locking).
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Persistent store of user credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a user and return its ID.
    ///
    /// Uniqueness of the identity is enforced by the storage engine, so two
    /// racing inserts for the same email yield exactly one success and one
    /// `StoreError::DuplicateIdentity`.
    async fn create(&self, new_user: &NewUser) -> Result<i64, StoreError>;

    /// Look up a user by identity.
    async fn find_by_identity(&self, email: &str) -> Result<User, StoreError>;
}

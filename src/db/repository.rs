//! User repository for Portier.
//!
//! SQLite implementation of [`CredentialStore`]. All statements are
//! parameterized.

use axum::async_trait;
use sqlx::SqlitePool;

use super::repository_traits::{CredentialStore, StoreError};
use super::user::{NewUser, User};

/// Repository for user records.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new UserRepository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(count.0)
    }
}

fn storage_error(e: sqlx::Error) -> StoreError {
    StoreError::Storage(e.to_string())
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<i64, StoreError> {
        let result = sqlx::query("INSERT INTO users (fullname, email, password) VALUES (?, ?, ?)")
            .bind(&new_user.fullname)
            .bind(&new_user.email)
            .bind(&new_user.password)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    StoreError::DuplicateIdentity
                }
                other => storage_error(other),
            })?;

        Ok(result.last_insert_rowid())
    }

    async fn find_by_identity(&self, email: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT id, fullname, email, password FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .ok_or(StoreError::NotFound)
    }
}

//! Error types for Portier.

use thiserror::Error;

/// Common error type for Portier.
///
/// Covers startup and infrastructure failures. Request-level failures use the
/// component error enums (`StoreError`, `SessionError`, ...) and are mapped to
/// HTTP responses in `web::error`.
#[derive(Error, Debug)]
pub enum PortierError {
    /// Database error.
    ///
    /// Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] crate::template::TemplateError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for PortierError {
    fn from(e: sqlx::Error) -> Self {
        PortierError::Database(e.to_string())
    }
}

/// Result type alias for Portier operations.
pub type Result<T> = std::result::Result<T, PortierError>;

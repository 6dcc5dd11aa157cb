//! HTTP error handling for Portier.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::db::StoreError;
use crate::template::TemplateError;

/// Message shown for any failure whose details stay server-side.
pub const GENERIC_ERROR_MESSAGE: &str = "Internal Server Error";

/// Error returned by page handlers.
///
/// Only `message` reaches the client. Causes are logged where the error is
/// built.
#[derive(Debug)]
pub struct WebError {
    status: StatusCode,
    message: String,
}

impl WebError {
    /// Create a new error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Create an internal server error with a client-visible message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Log `cause` and create a generic internal server error.
    pub fn internal_from(cause: impl std::fmt::Display) -> Self {
        tracing::error!("Internal error: {}", cause);
        Self::internal(GENERIC_ERROR_MESSAGE)
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Client-visible message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for WebError {}

impl From<TemplateError> for WebError {
    fn from(err: TemplateError) -> Self {
        Self::internal_from(err)
    }
}

impl From<StoreError> for WebError {
    fn from(err: StoreError) -> Self {
        Self::internal_from(err)
    }
}

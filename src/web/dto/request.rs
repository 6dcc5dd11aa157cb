//! Form payloads posted by the HTML views.
//!
//! Missing fields deserialize as empty strings so that input validation,
//! not the extractor, decides what the user sees.

use std::fmt;

use serde::Deserialize;

/// Login form (`POST /`).
#[derive(Deserialize)]
pub struct LoginForm {
    /// Email.
    #[serde(default)]
    pub email: String,
    /// Password.
    #[serde(default)]
    pub password: String,
}

/// Registration form (`POST /register`).
#[derive(Deserialize)]
pub struct RegisterForm {
    /// Full name.
    #[serde(default)]
    pub fullname: String,
    /// Email.
    #[serde(default)]
    pub email: String,
    /// Password.
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

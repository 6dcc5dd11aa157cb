//! User model for Portier.

use std::fmt;

/// A registered user.
#[derive(Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Display name.
    pub fullname: String,
    /// Login identity (unique, normalized to lower case).
    pub email: String,
    /// Password hash (Argon2 PHC string).
    pub password: String,
}

// The hash never shows up in logs.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Data for creating a new user.
#[derive(Clone)]
pub struct NewUser {
    /// Display name.
    pub fullname: String,
    /// Login identity.
    pub email: String,
    /// Password hash (must already be hashed with Argon2).
    pub password: String,
}

impl NewUser {
    /// Create a new user record from an already hashed password.
    pub fn new(
        fullname: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            fullname: fullname.into(),
            email: email.into(),
            password: password_hash.into(),
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

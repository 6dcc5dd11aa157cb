//! Session management for Portier.
//!
//! Sessions are stateless: the full [`Session`] is serialized to JSON and
//! sealed into the cookie value with the `cookie` crate's private jar
//! (AES-256-GCM, cookie name bound as associated data). Nothing is stored
//! server-side, so validation only needs the process-wide key.
//!
//! Lifecycle: `Unissued -> Active -> (Expired | Revoked)`.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use cookie::time::{Duration as CookieDuration, OffsetDateTime};
use cookie::{Cookie, CookieBuilder, CookieJar, Key, SameSite};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::{PortierError, Result};

/// Minimum length of the session secret in bytes.
pub const MIN_KEY_LENGTH: usize = 32;

/// Default session lifetime (7 days).
pub const DEFAULT_SESSION_DURATION_SECS: u64 = 7 * 24 * 60 * 60;

/// Longest accepted session lifetime (10 years).
pub const MAX_SESSION_DURATION_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Session-related errors.
///
/// The variants stay distinct for logging. Callers facing the client treat
/// every one of them the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No session cookie was presented.
    #[error("session cookie missing")]
    Missing,

    /// The cookie failed decryption/authentication or held a malformed payload.
    #[error("session cookie invalid")]
    Invalid,

    /// The session lifetime has elapsed.
    #[error("session expired")]
    Expired,

    /// The session is not marked authenticated (e.g. after logout).
    #[error("session not authenticated")]
    NotAuthenticated,

    /// The session could not be serialized or sealed.
    #[error("session encoding failed: {0}")]
    Encode(String),
}

/// Lifecycle state of a decoded session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Authenticated and within its lifetime.
    Active,
    /// Lifetime elapsed.
    Expired,
    /// Explicitly ended by logout.
    Revoked,
}

/// Session payload carried in the cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID v4).
    pub id: String,
    /// Whether the bearer logged in successfully.
    pub authenticated: bool,
    /// Bound user identity.
    pub email: String,
    /// Bound user ID.
    pub user_id: i64,
    /// Issue time (unix seconds).
    pub issued_at: i64,
    /// Expiry time (unix seconds).
    pub expires_at: i64,
}

impl Session {
    /// State of this session at the given instant.
    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        if !self.authenticated {
            SessionState::Revoked
        } else if now.timestamp() >= self.expires_at {
            SessionState::Expired
        } else {
            SessionState::Active
        }
    }

    /// State of this session now.
    pub fn state(&self) -> SessionState {
        self.state_at(Utc::now())
    }
}

/// Read the session secret from a file and derive the cookie key.
///
/// Fails if the file is unreadable or shorter than [`MIN_KEY_LENGTH`] bytes.
pub fn load_session_key(path: impl AsRef<Path>) -> Result<Key> {
    let path = path.as_ref();
    let secret = std::fs::read(path).map_err(|e| {
        PortierError::Config(format!(
            "unable to read session key {}: {e}",
            path.display()
        ))
    })?;
    session_key_from_bytes(&secret)
}

/// Derive the cookie key from raw secret bytes.
pub fn session_key_from_bytes(secret: &[u8]) -> Result<Key> {
    if secret.len() < MIN_KEY_LENGTH {
        return Err(PortierError::Config(format!(
            "session key must be at least {MIN_KEY_LENGTH} bytes (got {})",
            secret.len()
        )));
    }
    Ok(Key::derive_from(secret))
}

/// Issues, validates, and revokes session cookies.
#[derive(Clone)]
pub struct SessionManager {
    key: Key,
    cookie_name: String,
    max_age: Duration,
    secure: bool,
}

impl SessionManager {
    /// Create a session manager from a key and the session configuration.
    ///
    /// Fails if the configured lifetime is zero or longer than
    /// [`MAX_SESSION_DURATION_SECS`].
    pub fn new(key: Key, config: &SessionConfig) -> Result<Self> {
        let max_age = Some(config.max_age_secs)
            .filter(|secs| (1..=MAX_SESSION_DURATION_SECS).contains(secs))
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                PortierError::Config(format!(
                    "session.max_age_secs must be between 1 and {MAX_SESSION_DURATION_SECS}"
                ))
            })?;

        Ok(Self {
            key,
            cookie_name: config.cookie_name.clone(),
            max_age,
            secure: config.secure,
        })
    }

    /// Create a session manager with the default cookie settings.
    pub fn with_key(key: Key) -> Self {
        let defaults = SessionConfig::default();
        Self {
            key,
            cookie_name: defaults.cookie_name,
            max_age: Duration::days(7),
            secure: defaults.secure,
        }
    }

    /// Name of the session cookie.
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Session lifetime.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Issue a session cookie for a freshly authenticated user.
    pub fn issue(
        &self,
        email: &str,
        user_id: i64,
    ) -> std::result::Result<Cookie<'static>, SessionError> {
        self.issue_at(email, user_id, Utc::now())
    }

    /// Issue a session cookie as of `now`.
    pub fn issue_at(
        &self,
        email: &str,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> std::result::Result<Cookie<'static>, SessionError> {
        let expires_at = now
            .checked_add_signed(self.max_age)
            .ok_or_else(|| SessionError::Encode("session lifetime out of range".to_string()))?;

        let session = Session {
            id: Uuid::new_v4().to_string(),
            authenticated: true,
            email: email.to_string(),
            user_id,
            issued_at: now.timestamp(),
            expires_at: expires_at.timestamp(),
        };

        let cookie = self
            .base_cookie(encode(&session)?)
            .max_age(CookieDuration::seconds(self.max_age.num_seconds()))
            .build();

        self.seal(cookie)
    }

    /// Validate the session cookie presented with a request.
    pub fn validate(
        &self,
        cookie: Option<&Cookie<'_>>,
    ) -> std::result::Result<Session, SessionError> {
        self.validate_at(cookie, Utc::now())
    }

    /// Validate the session cookie as of `now`.
    ///
    /// No field of the payload is looked at before the cookie has been
    /// authenticated.
    pub fn validate_at(
        &self,
        cookie: Option<&Cookie<'_>>,
        now: DateTime<Utc>,
    ) -> std::result::Result<Session, SessionError> {
        let cookie = cookie.ok_or(SessionError::Missing)?;

        let jar = CookieJar::new();
        let opened = jar
            .private(&self.key)
            .decrypt(cookie.clone().into_owned())
            .ok_or(SessionError::Invalid)?;

        let session: Session =
            serde_json::from_str(opened.value()).map_err(|_| SessionError::Invalid)?;

        match session.state_at(now) {
            SessionState::Revoked => Err(SessionError::NotAuthenticated),
            SessionState::Expired => Err(SessionError::Expired),
            SessionState::Active if session.email.is_empty() => Err(SessionError::Invalid),
            SessionState::Active => Ok(session),
        }
    }

    /// Build a cookie that ends the session immediately.
    ///
    /// The cookie carries a sealed, unauthenticated payload with a zero
    /// max-age. Revoking nothing, or an already revoked session, produces
    /// the same cookie.
    pub fn revoke(&self, session: Option<&Session>) -> Cookie<'static> {
        let now = Utc::now().timestamp();
        let revoked = Session {
            id: session.map(|s| s.id.clone()).unwrap_or_default(),
            authenticated: false,
            email: String::new(),
            user_id: 0,
            issued_at: now,
            expires_at: now,
        };

        let sealed = encode(&revoked).and_then(|value| {
            let cookie = self
                .base_cookie(value)
                .max_age(CookieDuration::ZERO)
                .expires(OffsetDateTime::UNIX_EPOCH)
                .build();
            self.seal(cookie)
        });

        match sealed {
            Ok(cookie) => cookie,
            Err(e) => {
                debug!(error = %e, "Falling back to an empty removal cookie");
                self.base_cookie(String::new())
                    .max_age(CookieDuration::ZERO)
                    .expires(OffsetDateTime::UNIX_EPOCH)
                    .build()
            }
        }
    }

    fn base_cookie(&self, value: String) -> CookieBuilder<'static> {
        Cookie::build((self.cookie_name.clone(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
    }

    fn seal(&self, cookie: Cookie<'static>) -> std::result::Result<Cookie<'static>, SessionError> {
        let mut jar = CookieJar::new();
        jar.private_mut(&self.key).add(cookie);
        jar.get(&self.cookie_name)
            .cloned()
            .ok_or_else(|| SessionError::Encode("sealed cookie missing".to_string()))
    }
}

fn encode(session: &Session) -> std::result::Result<String, SessionError> {
    serde_json::to_string(session).map_err(|e| SessionError::Encode(e.to_string()))
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("cookie_name", &self.cookie_name)
            .field("max_age", &self.max_age)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

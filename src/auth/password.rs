//! Password hashing and verification for Portier.
//!
//! Uses Argon2id with a per-call random salt.

use std::sync::OnceLock;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use rand_core::OsRng;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::warn;

/// Argon2 memory cost in KiB (19 MiB).
pub const MEMORY_COST_KIB: u32 = 19_456;

/// Argon2 time cost (iterations).
pub const TIME_COST: u32 = 2;

/// Argon2 parallelism.
pub const PARALLELISM: u32 = 1;

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),
}

/// Create the Argon2id hasher.
///
/// Parameters:
/// - Memory cost: 19 MiB
/// - Time cost: 2 iterations
/// - Parallelism: 1 lane
///
/// One hash takes a few tens of milliseconds on commodity hardware.
fn create_argon2() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

/// Hash a password using Argon2id.
///
/// Returns a PHC-formatted hash string that embeds the salt and parameters.
///
/// # Examples
///
/// ```
/// use portier::hash_password;
/// use secrecy::SecretString;
///
/// let hash = hash_password(&SecretString::from("my_password".to_string())).unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &SecretString) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = create_argon2()?;
    let hash = argon2
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// The comparison is constant-time. A malformed hash is reported as a
/// mismatch, never as an error.
///
/// # Examples
///
/// ```
/// use portier::{hash_password, verify_password};
/// use secrecy::SecretString;
///
/// let hash = hash_password(&SecretString::from("my_password".to_string())).unwrap();
/// assert!(verify_password(&hash, &SecretString::from("my_password".to_string())));
/// assert!(!verify_password(&hash, &SecretString::from("wrong_password".to_string())));
/// ```
pub fn verify_password(hash: &str, password: &SecretString) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };

    // Parameters come from the parsed hash, not from create_argon2()
    Argon2::default()
        .verify_password(password.expose_secret().as_bytes(), &parsed_hash)
        .is_ok()
}

/// Spend one verification against a throwaway hash.
///
/// Used when the identity is unknown so that the response takes as long as a
/// real password check.
pub fn verify_dummy(password: &SecretString) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let dummy = DUMMY_HASH.get_or_init(|| {
        hash_password(&SecretString::from("portier-timing-equalizer".to_string())).ok()
    });

    if let Some(hash) = dummy {
        let _ = verify_password(hash, password);
    }
}

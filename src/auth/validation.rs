//! Input validation for Portier registration and login.
//!
//! This module provides validation functions for full names, email
//! addresses, and passwords.

use thiserror::Error;

/// Maximum full name length (characters, after trimming).
pub const MAX_FULLNAME_LENGTH: usize = 100;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum password length (characters).
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Full name is empty.
    #[error("full name cannot be empty")]
    FullnameEmpty,

    /// Full name is too long.
    #[error("full name must be at most {MAX_FULLNAME_LENGTH} characters")]
    FullnameTooLong,

    /// Full name contains control characters.
    #[error("full name contains invalid characters")]
    FullnameInvalidChars,

    /// Email is empty.
    #[error("email cannot be empty")]
    EmailEmpty,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("invalid email format")]
    EmailInvalidFormat,

    /// Password is empty.
    #[error("password cannot be empty")]
    PasswordEmpty,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    PasswordTooLong,
}

/// Normalize an email address for storage and lookup.
///
/// # Examples
///
/// ```
/// use portier::auth::validation::normalize_email;
///
/// assert_eq!(normalize_email("  Alice@X.com "), "alice@x.com");
/// ```
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate a full name.
///
/// Requirements:
/// - Not empty after trimming
/// - Length: at most 100 characters
/// - No control characters
pub fn validate_fullname(fullname: &str) -> Result<(), ValidationError> {
    let fullname = fullname.trim();

    if fullname.is_empty() {
        return Err(ValidationError::FullnameEmpty);
    }

    // Characters, not bytes
    if fullname.chars().count() > MAX_FULLNAME_LENGTH {
        return Err(ValidationError::FullnameTooLong);
    }

    if fullname.chars().any(|c| c.is_control()) {
        return Err(ValidationError::FullnameInvalidChars);
    }

    Ok(())
}

/// Validate an email address.
///
/// Deliberately loose: one `@` with text on both sides and no whitespace.
///
/// # Examples
///
/// ```
/// use portier::auth::validation::validate_email;
///
/// assert!(validate_email("alice@x.com").is_ok());
/// assert!(validate_email("invalid").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailEmpty);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }

    if email.chars().any(|c| c.is_whitespace()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(ValidationError::EmailInvalidFormat),
    }
}

/// Validate a password.
///
/// Requirements:
/// - Not empty
/// - Length: at most 128 characters
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordEmpty);
    }
    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }
    Ok(())
}

/// Validate all registration fields at once.
///
/// Expects an already normalized email. Returns the first error found.
pub fn validate_registration(
    fullname: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationError> {
    validate_fullname(fullname)?;
    validate_email(email)?;
    validate_password(password)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("alice@x.com"), "alice@x.com");
        assert_eq!(normalize_email("ALICE@X.COM"), "alice@x.com");
        assert_eq!(normalize_email("\talice@x.com\n"), "alice@x.com");
    }

    #[test]
    fn test_validate_fullname_valid() {
        assert!(validate_fullname("Alice").is_ok());
        assert!(validate_fullname("Alice Liddell").is_ok());
        assert!(validate_fullname("山田 太郎").is_ok());
        assert!(validate_fullname("  padded  ").is_ok());
    }

    #[test]
    fn test_validate_fullname_empty() {
        assert_eq!(validate_fullname(""), Err(ValidationError::FullnameEmpty));
        assert_eq!(validate_fullname("   "), Err(ValidationError::FullnameEmpty));
    }

    #[test]
    fn test_validate_fullname_length() {
        assert!(validate_fullname(&"a".repeat(100)).is_ok());
        assert_eq!(
            validate_fullname(&"a".repeat(101)),
            Err(ValidationError::FullnameTooLong)
        );
        // Multibyte names are counted in characters
        assert!(validate_fullname(&"あ".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_fullname_control_chars() {
        assert_eq!(
            validate_fullname("Alice\u{0007}"),
            Err(ValidationError::FullnameInvalidChars)
        );
        assert_eq!(
            validate_fullname("Al\nice"),
            Err(ValidationError::FullnameInvalidChars)
        );
    }

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("alice@x.com").is_ok());
        assert!(validate_email("a.b+tag@sub.example.org").is_ok());
        assert!(validate_email("user@localhost").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert_eq!(validate_email(""), Err(ValidationError::EmailEmpty));
        assert_eq!(
            validate_email("invalid"),
            Err(ValidationError::EmailInvalidFormat)
        );
        assert_eq!(
            validate_email("@x.com"),
            Err(ValidationError::EmailInvalidFormat)
        );
        assert_eq!(
            validate_email("alice@"),
            Err(ValidationError::EmailInvalidFormat)
        );
        assert_eq!(
            validate_email("a@b@c.com"),
            Err(ValidationError::EmailInvalidFormat)
        );
        assert_eq!(
            validate_email("ali ce@x.com"),
            Err(ValidationError::EmailInvalidFormat)
        );
    }

    #[test]
    fn test_validate_email_too_long() {
        let email = format!("{}@x.com", "a".repeat(250));
        assert_eq!(validate_email(&email), Err(ValidationError::EmailTooLong));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("pw123").is_ok());
        assert!(validate_password("x").is_ok());
        assert!(validate_password(&"p".repeat(128)).is_ok());
        assert_eq!(validate_password(""), Err(ValidationError::PasswordEmpty));
        assert_eq!(
            validate_password(&"p".repeat(129)),
            Err(ValidationError::PasswordTooLong)
        );
    }

    #[test]
    fn test_validate_registration_first_error() {
        assert!(validate_registration("Alice", "alice@x.com", "pw123").is_ok());
        assert_eq!(
            validate_registration("", "invalid", ""),
            Err(ValidationError::FullnameEmpty)
        );
        assert_eq!(
            validate_registration("Alice", "invalid", ""),
            Err(ValidationError::EmailInvalidFormat)
        );
        assert_eq!(
            validate_registration("Alice", "alice@x.com", ""),
            Err(ValidationError::PasswordEmpty)
        );
    }
}

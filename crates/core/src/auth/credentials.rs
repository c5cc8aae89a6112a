//! Account passwords: the length policy and Argon2id storage.
//!
//! Every password that reaches [`hash_password`] is checked against
//! [`check_policy`] first, so no account can be stored with a password the
//! registration form would have refused.

use argon2::password_hash::{self, SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use thiserror::Error;
use yaracheck_shared::AppError;

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Longest accepted password, in characters.
pub const MAX_PASSWORD_LEN: usize = 128;

/// Password policy and hashing failures.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Fewer than [`MIN_PASSWORD_LEN`] characters.
    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    TooShort,

    /// More than [`MAX_PASSWORD_LEN`] characters.
    #[error("Password must be at most {MAX_PASSWORD_LEN} characters")]
    TooLong,

    /// Argon2 could not produce a hash.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// The stored hash is not a PHC string.
    #[error("stored password hash is malformed")]
    MalformedHash,
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::TooShort | PasswordError::TooLong => Self::Validation(e.to_string()),
            PasswordError::Hashing(_) | PasswordError::MalformedHash => {
                Self::Internal(e.to_string())
            }
        }
    }
}

/// Checks a new password against the length policy.
pub fn check_policy(password: &str) -> Result<(), PasswordError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        Err(PasswordError::TooShort)
    } else if len > MAX_PASSWORD_LEN {
        Err(PasswordError::TooLong)
    } else {
        Ok(())
    }
}

/// Checks the policy and returns the Argon2id PHC string for `password`.
///
/// ```
/// use yaracheck_core::auth::{hash_password, verify_password};
///
/// let stored = hash_password("lagos-2026").unwrap();
/// assert!(verify_password("lagos-2026", &stored).unwrap());
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    check_policy(password)?;
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// Returns whether `password` matches the stored hash.
///
/// Login never applies the policy: accounts created before a policy change
/// must still be able to sign in.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|_| PasswordError::MalformedHash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hashing(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", false)]
    #[case("seven77", false)]
    #[case("eight888", true)]
    #[case("ñandú-ñandú", true)]
    fn test_minimum_length_counts_characters(#[case] password: &str, #[case] ok: bool) {
        assert_eq!(check_policy(password).is_ok(), ok);
    }

    #[test]
    fn test_overlong_password_is_refused() {
        let long = "x".repeat(MAX_PASSWORD_LEN + 1);
        assert!(matches!(check_policy(&long), Err(PasswordError::TooLong)));
        assert!(check_policy(&long[..MAX_PASSWORD_LEN]).is_ok());
    }

    #[test]
    fn test_short_password_is_never_hashed() {
        assert!(matches!(hash_password("abc"), Err(PasswordError::TooShort)));
    }

    #[test]
    fn test_stored_hash_round_trip() {
        let stored = hash_password("stolen-bicycle").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password("stolen-bicycle", &stored).unwrap());
        assert!(!verify_password("stolen-bicycles", &stored).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(
            hash_password("same-secret").unwrap(),
            hash_password("same-secret").unwrap()
        );
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            verify_password("whatever1", "plaintext"),
            Err(PasswordError::MalformedHash)
        ));
    }

    #[test]
    fn test_policy_errors_are_validation_errors() {
        let err: AppError = PasswordError::TooShort.into();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        let err: AppError = PasswordError::MalformedHash.into();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }
}

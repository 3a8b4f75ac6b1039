//! Password hashing and verification.
//!
//! Credentials are Argon2id PHC strings. The strength policy is enforced
//! at hash time, so a too-weak password can never produce a stored
//! credential in the first place.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

/// Errors from hashing or verifying a password.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The candidate password fails the strength policy.
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    TooShort,

    /// The stored credential is not a valid PHC string.
    #[error("stored credential is not a valid PHC string")]
    MalformedHash,

    /// The hashing primitive itself failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Checks a candidate password against the strength policy.
fn check_strength(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }
    Ok(())
}

/// Hashes a password into an Argon2id PHC string, enforcing the strength
/// policy first.
///
/// # Errors
///
/// Returns `PasswordError::TooShort` for a password under the minimum
/// length and `PasswordError::Hashing` if the primitive fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    check_strength(password)?;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// Verifies a candidate password against a stored PHC credential.
///
/// Returns `true` on a match, `false` on a mismatch.
///
/// # Errors
///
/// Returns `PasswordError::MalformedHash` if the stored credential cannot
/// be parsed, and `PasswordError::Hashing` on unexpected primitive
/// failures.
pub fn verify_password(candidate: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|_| PasswordError::MalformedHash)?;

    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hashing(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_produces_phc_format() {
        let hash = hash_password("a-decent-password").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_round_trip() {
        let hash = hash_password("correct-horse-battery").unwrap();
        assert!(verify_password("correct-horse-battery", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_short_password_never_hashed() {
        assert!(matches!(
            hash_password("1234567"),
            Err(PasswordError::TooShort)
        ));
        assert!(hash_password("12345678").is_ok());
    }

    #[test]
    fn test_salting_makes_hashes_unique() {
        let first = hash_password("same-password").unwrap();
        let second = hash_password("same-password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_stored_credential() {
        assert!(matches!(
            verify_password("whatever", "not-a-phc-hash"),
            Err(PasswordError::MalformedHash)
        ));
    }
}

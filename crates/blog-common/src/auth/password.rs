//! Password hashing and verification utilities
//!
//! Uses Argon2id for password hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use blog_core::DomainError;

use crate::error::AppError;

/// Minimum password length in characters
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a hash
///
/// # Errors
/// Returns an error if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Password service for dependency injection
#[derive(Debug, Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash_password(password)
    }

    /// Verify a password and return `InvalidCredentials` if it does not match
    pub fn verify_or_error(&self, password: &str, hash: &str) -> Result<(), AppError> {
        if verify_password(password, hash)? {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials)
        }
    }
}

/// Validate password strength: at least 8 characters with an uppercase
/// letter, a lowercase letter and a digit
///
/// # Errors
/// Returns `DomainError::WeakPassword` describing the first unmet rule
pub fn validate_password_strength(password: &str) -> Result<(), DomainError> {
    let rule = if password.chars().count() < MIN_PASSWORD_LEN {
        Some("must be at least 8 characters long")
    } else if !password.chars().any(char::is_uppercase) {
        Some("must contain at least one uppercase letter")
    } else if !password.chars().any(char::is_lowercase) {
        Some("must contain at least one lowercase letter")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("must contain at least one digit")
    } else {
        None
    };

    match rule {
        Some(rule) => Err(DomainError::WeakPassword(rule.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "SecurePassword123!";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, hash_password(password).unwrap());
        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("WrongPassword123!", &hash).unwrap());
    }

    #[test]
    fn test_each_hash_gets_fresh_salt() {
        let first = hash_password("SecurePassword123!").unwrap();
        let second = hash_password("SecurePassword123!").unwrap();

        let salt = |hash: &str| PasswordHash::new(hash).unwrap().salt.map(|s| s.as_str().to_string());
        assert!(salt(&first).is_some());
        assert_ne!(salt(&first), salt(&second));
    }

    #[test]
    fn test_malformed_hash() {
        assert!(verify_password("x", "not-a-hash").is_err());
    }

    #[test]
    fn test_verify_or_error() {
        let service = PasswordService::new();
        let hash = service.hash("SecurePassword123!").unwrap();

        assert!(service.verify_or_error("SecurePassword123!", &hash).is_ok());
        assert!(matches!(
            service.verify_or_error("wrong", &hash),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("SecurePass1").is_ok());
        assert!(validate_password_strength("Abcdefg1").is_ok());

        let cases = [
            ("Short1", "8 characters"),
            ("lowercase123", "uppercase"),
            ("UPPERCASE123", "lowercase"),
            ("NoDigitsHere", "digit"),
        ];
        for (password, expected) in cases {
            match validate_password_strength(password) {
                Err(DomainError::WeakPassword(msg)) => assert!(msg.contains(expected), "{msg}"),
                other => panic!("expected weak password for {password}, got {other:?}"),
            }
        }
    }
}

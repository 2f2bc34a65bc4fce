//! Password hashing and the sign-up password rules
//!
//! Hashes with Argon2id.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use onelink_core::DomainError;

use crate::error::AppError;

/// Shortest password accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_PASSWORD_LENGTH: usize = 128;

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

/// Verify a password against a stored hash
///
/// # Errors
/// Returns an error if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Check a new password and its confirmation, in this order:
/// equality, minimum length, then strength.
///
/// # Errors
/// [`DomainError::PasswordMismatch`], [`DomainError::PasswordTooShort`] or
/// [`DomainError::WeakPassword`]
pub fn check_new_password(password: &str, confirmation: &str) -> Result<(), DomainError> {
    if password != confirmation {
        return Err(DomainError::PasswordMismatch);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(DomainError::WeakPassword(format!(
            "must be at most {MAX_PASSWORD_LENGTH} bytes"
        )));
    }

    if password.trim().is_empty() {
        return Err(DomainError::WeakPassword("must not be blank".to_string()));
    }

    let mut chars = password.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return Err(DomainError::WeakPassword(
                "must not repeat a single character".to_string(),
            ));
        }
    }

    Ok(())
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

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        verify_password(password, hash)
    }

    /// # Errors
    /// Returns `AppError::InvalidCredentials` if the password doesn't match
    pub fn verify_or_error(&self, password: &str, hash: &str) -> Result<(), AppError> {
        if self.verify(password, hash)? {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials)
        }
    }
}

//! Handle (username) rules
//!
//! A handle is 3 to 20 ASCII letters, digits or underscores. It is stored and
//! looked up lowercased, so `Jan_99` and `jan_99` are the same handle.

use crate::error::DomainError;

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 20;

/// Check a username against `^[a-zA-Z0-9_]{3,20}$`
pub fn validate_username(username: &str) -> Result<(), DomainError> {
    let len = username.len();
    if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&len) {
        return Err(DomainError::InvalidUsername(format!(
            "must be {USERNAME_MIN_LENGTH}-{USERNAME_MAX_LENGTH} characters"
        )));
    }
    if !username
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_')
    {
        return Err(DomainError::InvalidUsername(
            "only letters, digits and underscores are allowed".to_string(),
        ));
    }
    Ok(())
}

/// Canonical form used for storage and lookup
pub fn normalize_handle(handle: &str) -> String {
    handle.trim().to_lowercase()
}

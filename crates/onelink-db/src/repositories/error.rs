//! Error handling utilities for repositories

use onelink_core::DomainError;
use sqlx::Error as SqlxError;

/// Unique index on `users.username`
pub const USERNAME_UNIQUE_INDEX: &str = "users_username_key";
/// Unique index on `lower(accounts.email)`
pub const EMAIL_UNIQUE_INDEX: &str = "accounts_email_key";
/// Primary key of `users`; one profile per account
pub const PROFILE_PRIMARY_KEY: &str = "users_pkey";

/// Convert SQLx error to `DomainError`
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Map a unique violation through `on_unique`, which receives the violated
/// constraint name. Anything else becomes a database error.
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce(Option<&str>) -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique(db_err.constraint());
        }
    }
    map_db_error(e)
}

/// Conflict error for a violated account or profile constraint.
///
/// Constraints without a user-facing meaning stay database errors.
pub fn conflict_for(constraint: Option<&str>, username: &str) -> DomainError {
    match constraint {
        Some(USERNAME_UNIQUE_INDEX) => DomainError::UsernameTaken(username.to_string()),
        Some(EMAIL_UNIQUE_INDEX) => DomainError::EmailAlreadyExists,
        Some(PROFILE_PRIMARY_KEY) => DomainError::ProfileAlreadyExists,
        Some(other) => DomainError::DatabaseError(format!("unique violation on {other}")),
        None => DomainError::DatabaseError("unique violation".to_string()),
    }
}

//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Account not found: {0}")]
    AccountNotFound(Snowflake),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Link not found: {0}")]
    LinkNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Discord user id is required")]
    DiscordIdRequired,

    #[error("Invalid Discord user id: {0}")]
    InvalidDiscordId(String),

    #[error("Unknown social platform: {0}")]
    InvalidPlatform(String),

    #[error("{field} too long: max {max} characters")]
    ContentTooLong { field: &'static str, max: usize },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not link owner")]
    NotLinkOwner,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Profile already exists")]
    ProfileAlreadyExists,

    // =========================================================================
    // Stored data that failed validation on read
    // =========================================================================
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::ProfileNotFound(_) => "PROFILE_NOT_FOUND",
            Self::LinkNotFound(_) => "LINK_NOT_FOUND",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::PasswordTooShort { .. } => "PASSWORD_TOO_SHORT",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::DiscordIdRequired => "DISCORD_ID_REQUIRED",
            Self::InvalidDiscordId(_) => "INVALID_DISCORD_ID",
            Self::InvalidPlatform(_) => "INVALID_PLATFORM",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            // Authorization
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotLinkOwner => "NOT_LINK_OWNER",

            // Conflict
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_IN_USE",
            Self::ProfileAlreadyExists => "PROFILE_ALREADY_EXISTS",

            Self::CorruptRecord(_) => "CORRUPT_RECORD",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound(_) | Self::ProfileNotFound(_) | Self::LinkNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::InvalidUsername(_)
                | Self::PasswordMismatch
                | Self::PasswordTooShort { .. }
                | Self::WeakPassword(_)
                | Self::DiscordIdRequired
                | Self::InvalidDiscordId(_)
                | Self::InvalidPlatform(_)
                | Self::ContentTooLong { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotLinkOwner)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::UsernameTaken(_) | Self::EmailAlreadyExists | Self::ProfileAlreadyExists
        )
    }

    /// Check if the failure came from the storage or cache backends
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::CacheError(_))
    }
}

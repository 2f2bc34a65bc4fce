//! Service layer error types
//!
//! Domain errors pass through unchanged. Each use case collapses unexpected
//! failures into its own generic error so clients can show one message per
//! screen instead of leaking storage details.

use onelink_common::AppError;
use onelink_core::DomainError;
use thiserror::Error;

/// Service layer error type
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Domain rule violation
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Application error (auth, tokens)
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Registration failed for a reason the user cannot fix
    #[error("Registration failed")]
    RegistrationFailed,

    /// Storage or cache could not be reached
    #[error("Network request failed")]
    NetworkRequestFailed,

    #[error("Login failed")]
    LoginFailed,

    #[error("Google sign-in failed: {0}")]
    FederatedLoginFailed(String),

    #[error("Google sign-in is not configured")]
    FederatedLoginUnavailable,

    #[error("Failed to save profile")]
    ProfileSaveFailed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => domain_status(e),
            Self::App(e) => e.status_code(),
            Self::Validation(_) => 400,
            Self::FederatedLoginFailed(_) => 401,
            Self::NetworkRequestFailed | Self::FederatedLoginUnavailable => 503,
            Self::RegistrationFailed | Self::LoginFailed | Self::ProfileSaveFailed | Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::RegistrationFailed => "REGISTRATION_FAILED",
            Self::NetworkRequestFailed => "NETWORK_REQUEST_FAILED",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::FederatedLoginFailed(_) => "FEDERATED_LOGIN_FAILED",
            Self::FederatedLoginUnavailable => "FEDERATED_LOGIN_UNAVAILABLE",
            Self::ProfileSaveFailed => "PROFILE_SAVE_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The wrapped domain error, if any
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) | Self::App(AppError::Domain(e)) => Some(e),
            _ => None,
        }
    }
}

fn domain_status(e: &DomainError) -> u16 {
    if e.is_not_found() {
        404
    } else if matches!(e, DomainError::InvalidCredentials) {
        401
    } else if e.is_authorization() {
        403
    } else if e.is_validation() {
        400
    } else if e.is_conflict() {
        409
    } else {
        500
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::FederatedLoginFailed(_) => AppError::InvalidCredentials,
            ServiceError::NetworkRequestFailed => AppError::Unavailable("storage".to_string()),
            ServiceError::FederatedLoginUnavailable => {
                AppError::Unavailable("google sign-in".to_string())
            }
            other => AppError::Internal(anyhow::anyhow!(other.to_string())),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

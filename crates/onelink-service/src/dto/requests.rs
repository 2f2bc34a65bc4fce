//! Request DTOs for API endpoints
//!
//! Registration and link input are checked by the services in a fixed order,
//! so they carry no derive-level rules. The simpler bodies use `validator`.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Federated sign-in with a Google ID token
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GoogleLoginRequest {
    #[validate(length(min = 1, message = "ID token is required"))]
    pub id_token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogoutRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

// ============================================================================
// Profile Requests
// ============================================================================

/// Claim a handle for an account that has no profile yet
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimHandleRequest {
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SocialLinkInput {
    pub platform: String,
    pub url: String,
}

/// Full replacement of the editable profile fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub social_links: Vec<SocialLinkInput>,
}

// ============================================================================
// Link Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CreateLinkRequest {
    Discord {
        #[serde(default)]
        discord_id: String,
    },
    Custom {
        #[serde(default)]
        title: String,
        #[serde(default)]
        url: String,
        #[serde(default)]
        description: Option<String>,
    },
}

// ============================================================================
// Queries
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardSection {
    #[default]
    Links,
    Overview,
    Appearance,
    Settings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub section: DashboardSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavigationQuery {
    #[serde(default = "root_path")]
    pub path: String,
}

fn root_path() -> String {
    "/".to_string()
}

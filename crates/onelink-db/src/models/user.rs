//! User profile database model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub avatar: String,
    /// JSONB array of [`SocialLinkRecord`], checked when mapped to an entity
    pub social_links: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One element of `users.social_links`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinkRecord {
    pub platform: String,
    pub url: String,
    /// Written for readers of the raw table; ignored on load
    #[serde(default)]
    pub icon: String,
}

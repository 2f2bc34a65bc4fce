//! Link database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for links table
#[derive(Debug, Clone, FromRow)]
pub struct LinkModel {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub url: String,
    pub description: String,
    pub link_type: String,
    pub discord_id: Option<String>,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

//! Account database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for accounts table
#[derive(Debug, Clone, FromRow)]
pub struct AccountModel {
    pub id: i64,
    pub email: String,
    pub display_name: Option<String>,
    pub google_subject: Option<String>,
    pub created_at: DateTime<Utc>,
}

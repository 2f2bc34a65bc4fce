//! Account entity - the authentication identity behind a profile

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Authentication identity.
///
/// An account exists independently of its public profile ([`crate::User`]):
/// accounts created through Google sign-in have no profile until they claim a
/// handle. Password hashes are never loaded into the entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Snowflake,
    pub email: String,
    pub display_name: Option<String>,
    pub google_subject: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create an email/password account
    pub fn new(id: Snowflake, email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into().trim().to_lowercase(),
            display_name: Some(display_name.into()),
            google_subject: None,
            created_at: Utc::now(),
        }
    }

    /// Create an account backed only by a Google identity
    pub fn federated(
        id: Snowflake,
        email: impl Into<String>,
        google_subject: impl Into<String>,
        display_name: Option<String>,
    ) -> Self {
        Self {
            id,
            email: email.into().trim().to_lowercase(),
            display_name,
            google_subject: Some(google_subject.into()),
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_federated(&self) -> bool {
        self.google_subject.is_some()
    }
}

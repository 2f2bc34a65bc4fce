//! User entity - the public profile published at a handle

use chrono::{DateTime, Utc};

use crate::entities::SocialLink;
use crate::value_objects::{normalize_handle, Snowflake};

/// Profile document. Shares its id with the owning [`crate::Account`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub avatar: String,
    pub social_links: Vec<SocialLink>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create an empty profile for a freshly registered account.
    ///
    /// The handle is stored lowercased.
    pub fn new(id: Snowflake, username: &str, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            username: normalize_handle(username),
            email: email.into(),
            bio: String::new(),
            avatar: String::new(),
            social_links: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable part of the profile in one go
    pub fn update_profile(&mut self, bio: String, avatar: String, social_links: Vec<SocialLink>) {
        self.bio = bio;
        self.avatar = avatar;
        self.social_links = social_links;
        self.updated_at = Utc::now();
    }

    /// Avatar URL, if one was set
    pub fn avatar_url(&self) -> Option<&str> {
        if self.avatar.is_empty() {
            None
        } else {
            Some(&self.avatar)
        }
    }

    /// Whole days since the profile was created, never less than one
    pub fn days_active(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_days().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::SocialPlatform;
    use chrono::Duration;

    #[test]
    fn test_new_user_is_lowercased_and_empty() {
        let user = User::new(Snowflake::new(1), "Jan_Kowalski", "jan@example.com");
        assert_eq!(user.username, "jan_kowalski");
        assert!(user.bio.is_empty());
        assert!(user.avatar_url().is_none());
        assert!(user.social_links.is_empty());
    }

    #[test]
    fn test_update_profile_replaces_all_fields() {
        let mut user = User::new(Snowflake::new(1), "jan", "jan@example.com");
        user.update_profile(
            "hello".to_string(),
            "https://img.example.com/a.png".to_string(),
            vec![SocialLink::new(SocialPlatform::Github, "https://github.com/jan")],
        );
        assert_eq!(user.bio, "hello");
        assert_eq!(user.avatar_url(), Some("https://img.example.com/a.png"));
        assert_eq!(user.social_links.len(), 1);

        user.update_profile(String::new(), String::new(), vec![]);
        assert!(user.social_links.is_empty());
        assert!(user.avatar_url().is_none());
    }

    #[test]
    fn test_days_active_floor() {
        let user = User::new(Snowflake::new(1), "jan", "jan@example.com");
        assert_eq!(user.days_active(user.created_at), 1);
        assert_eq!(user.days_active(user.created_at + Duration::days(10)), 10);
    }
}

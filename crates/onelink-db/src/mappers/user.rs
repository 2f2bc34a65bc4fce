//! User entity <-> model mapper

use onelink_core::{DomainError, SocialLink, SocialPlatform, Snowflake, User};

use crate::models::{SocialLinkRecord, UserModel};

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let records: Vec<SocialLinkRecord> = serde_json::from_value(model.social_links)
            .map_err(|e| {
                DomainError::CorruptRecord(format!("social links of user {}: {e}", model.id))
            })?;

        let social_links = records
            .into_iter()
            .map(|record| {
                let platform = SocialPlatform::parse(&record.platform).map_err(|_| {
                    DomainError::CorruptRecord(format!(
                        "unknown platform '{}' on user {}",
                        record.platform, model.id
                    ))
                })?;
                Ok(SocialLink::new(platform, record.url))
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(User {
            id: Snowflake::new(model.id),
            username: model.username,
            email: model.email,
            bio: model.bio,
            avatar: model.avatar,
            social_links,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&SocialLink> for SocialLinkRecord {
    fn from(link: &SocialLink) -> Self {
        Self {
            platform: link.platform.key().to_string(),
            url: link.url.clone(),
            icon: link.icon().to_string(),
        }
    }
}

/// JSONB payload for `users.social_links`
pub fn social_links_to_json(links: &[SocialLink]) -> serde_json::Value {
    let records: Vec<SocialLinkRecord> = links.iter().map(SocialLinkRecord::from).collect();
    serde_json::to_value(records).unwrap_or_else(|_| serde_json::Value::Array(Vec::new()))
}

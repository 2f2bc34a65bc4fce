//! Link entity - an outbound URL owned by a single user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Title given to every synthesized Discord link
pub const DISCORD_LINK_TITLE: &str = "Discord";
/// Description given to every synthesized Discord link
pub const DISCORD_LINK_DESCRIPTION: &str = "My Discord profile";

/// Kind of link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Custom,
    Discord,
}

impl LinkType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Discord => "discord",
        }
    }

    /// Parse the stored representation
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "custom" => Ok(Self::Custom),
            "discord" => Ok(Self::Discord),
            other => Err(DomainError::CorruptRecord(format!("unknown link type '{other}'"))),
        }
    }
}

/// What the owner asked to create, before an id and timestamp are assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewLink {
    /// Shortcut from a pasted Discord user id
    Discord { discord_id: String },
    /// Generic title/url/description entry
    Custom {
        title: String,
        url: String,
        description: String,
    },
}

impl NewLink {
    /// Discord shortcut. The id is trimmed and must be a non-empty run of digits.
    pub fn discord(discord_id: &str) -> Result<Self, DomainError> {
        let discord_id = discord_id.trim();
        if discord_id.is_empty() {
            return Err(DomainError::DiscordIdRequired);
        }
        if discord_id.len() > 20 || !discord_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidDiscordId(discord_id.to_string()));
        }
        Ok(Self::Discord {
            discord_id: discord_id.to_string(),
        })
    }

    /// Generic link. Title and url are trimmed and required.
    pub fn custom(title: &str, url: &str, description: Option<&str>) -> Result<Self, DomainError> {
        let title = title.trim();
        let url = url.trim();
        if title.is_empty() {
            return Err(DomainError::ValidationError("title is required".to_string()));
        }
        if url.is_empty() {
            return Err(DomainError::ValidationError("url is required".to_string()));
        }
        Ok(Self::Custom {
            title: title.to_string(),
            url: url.to_string(),
            description: description.map(str::trim).unwrap_or_default().to_string(),
        })
    }
}

/// Link entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub title: String,
    pub url: String,
    pub description: String,
    pub link_type: LinkType,
    pub discord_id: Option<String>,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Materialize a new link for its owner with zero clicks
    pub fn create(id: Snowflake, user_id: Snowflake, new_link: NewLink) -> Self {
        let (title, url, description, link_type, discord_id) = match new_link {
            NewLink::Discord { discord_id } => (
                DISCORD_LINK_TITLE.to_string(),
                Self::discord_profile_url(&discord_id),
                DISCORD_LINK_DESCRIPTION.to_string(),
                LinkType::Discord,
                Some(discord_id),
            ),
            NewLink::Custom {
                title,
                url,
                description,
            } => (title, url, description, LinkType::Custom, None),
        };

        Self {
            id,
            user_id,
            title,
            url,
            description,
            link_type,
            discord_id,
            clicks: 0,
            created_at: Utc::now(),
        }
    }

    /// Public Discord profile URL for a user id
    pub fn discord_profile_url(discord_id: &str) -> String {
        format!("https://discord.com/users/{discord_id}")
    }

    #[inline]
    pub fn is_owned_by(&self, user_id: Snowflake) -> bool {
        self.user_id == user_id
    }

    #[inline]
    pub fn is_discord(&self) -> bool {
        self.link_type == LinkType::Discord
    }
}

/// Order links newest first.
///
/// Timestamps are UTC, so this matches a descending comparison of their
/// RFC 3339 strings. Ties fall back to the id, newest first.
pub fn sort_newest_first(links: &mut [Link]) {
    links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

/// First Discord link with an id, in the given order
pub fn find_discord_link(links: &[Link]) -> Option<&Link> {
    links
        .iter()
        .find(|l| l.is_discord() && l.discord_id.as_deref().is_some_and(|id| !id.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn link_at(id: i64, rfc3339: &str) -> Link {
        let mut link = Link::create(
            Snowflake::new(id),
            Snowflake::new(1),
            NewLink::custom("t", "https://example.com", None).unwrap(),
        );
        link.created_at = DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc);
        link
    }

    #[test]
    fn test_discord_link_synthesis() {
        let link = Link::create(
            Snowflake::new(10),
            Snowflake::new(1),
            NewLink::discord(" 123456789 ").unwrap(),
        );
        assert_eq!(link.title, "Discord");
        assert_eq!(link.url, "https://discord.com/users/123456789");
        assert_eq!(link.description, "My Discord profile");
        assert_eq!(link.link_type, LinkType::Discord);
        assert_eq!(link.discord_id.as_deref(), Some("123456789"));
        assert_eq!(link.clicks, 0);
    }

    #[test]
    fn test_discord_id_required() {
        assert!(matches!(NewLink::discord("   "), Err(DomainError::DiscordIdRequired)));
        assert!(matches!(
            NewLink::discord("abc"),
            Err(DomainError::InvalidDiscordId(_))
        ));
    }

    #[test]
    fn test_custom_link() {
        let link = Link::create(
            Snowflake::new(11),
            Snowflake::new(1),
            NewLink::custom(" Blog ", "https://blog.example.com", Some(" posts ")).unwrap(),
        );
        assert_eq!(link.title, "Blog");
        assert_eq!(link.description, "posts");
        assert_eq!(link.link_type, LinkType::Custom);
        assert!(link.discord_id.is_none());
        assert!(link.is_owned_by(Snowflake::new(1)));
        assert!(!link.is_owned_by(Snowflake::new(2)));
    }

    #[test]
    fn test_custom_link_requires_title_and_url() {
        assert!(NewLink::custom("", "https://x.io", None).is_err());
        assert!(NewLink::custom("x", " ", None).is_err());
    }

    #[test]
    fn test_sort_newest_first() {
        let mut links = vec![
            link_at(1, "2024-01-01T00:00:00Z"),
            link_at(2, "2024-02-01T00:00:00Z"),
        ];
        sort_newest_first(&mut links);
        assert_eq!(links[0].id, Snowflake::new(2));
        assert_eq!(
            links[0].created_at,
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_sort_ties_break_on_id() {
        let mut links = vec![
            link_at(5, "2024-01-01T00:00:00Z"),
            link_at(9, "2024-01-01T00:00:00Z"),
        ];
        sort_newest_first(&mut links);
        assert_eq!(links[0].id, Snowflake::new(9));
    }

    #[test]
    fn test_find_discord_link() {
        let custom = link_at(1, "2024-01-01T00:00:00Z");
        assert!(find_discord_link(std::slice::from_ref(&custom)).is_none());

        let discord = Link::create(
            Snowflake::new(2),
            Snowflake::new(1),
            NewLink::discord("123").unwrap(),
        );
        let links = vec![custom, discord];
        assert_eq!(
            find_discord_link(&links).and_then(|l| l.discord_id.as_deref()),
            Some("123")
        );
    }

    #[test]
    fn test_link_type_parse() {
        assert_eq!(LinkType::parse("custom").unwrap(), LinkType::Custom);
        assert_eq!(LinkType::parse("discord").unwrap(), LinkType::Discord);
        assert!(matches!(
            LinkType::parse("rss"),
            Err(DomainError::CorruptRecord(_))
        ));
    }
}

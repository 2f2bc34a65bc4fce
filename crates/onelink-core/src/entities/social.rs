//! Social platform catalog and the social links embedded in a profile

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Platforms a profile may link to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Facebook,
    Instagram,
    Twitter,
    Youtube,
    Tiktok,
    Github,
    Linkedin,
}

impl SocialPlatform {
    /// Every platform, in catalog order
    pub const ALL: [SocialPlatform; 7] = [
        Self::Facebook,
        Self::Instagram,
        Self::Twitter,
        Self::Youtube,
        Self::Tiktok,
        Self::Github,
        Self::Linkedin,
    ];

    /// Stable lowercase key, as stored and sent over the wire
    pub const fn key(self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Twitter => "twitter",
            Self::Youtube => "youtube",
            Self::Tiktok => "tiktok",
            Self::Github => "github",
            Self::Linkedin => "linkedin",
        }
    }

    /// Human readable name
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
            Self::Twitter => "Twitter",
            Self::Youtube => "YouTube",
            Self::Tiktok => "TikTok",
            Self::Github => "GitHub",
            Self::Linkedin => "LinkedIn",
        }
    }

    /// Icon glyph markup rendered next to the link
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Facebook => r#"<i class="fab fa-facebook"></i>"#,
            Self::Instagram => r#"<i class="fab fa-instagram"></i>"#,
            Self::Twitter => r#"<i class="fab fa-twitter"></i>"#,
            Self::Youtube => r#"<i class="fab fa-youtube"></i>"#,
            Self::Tiktok => r#"<i class="fab fa-tiktok"></i>"#,
            Self::Github => r#"<i class="fab fa-github"></i>"#,
            Self::Linkedin => r#"<i class="fab fa-linkedin"></i>"#,
        }
    }

    /// Parse a platform key
    pub fn parse(key: &str) -> Result<Self, DomainError> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| DomainError::InvalidPlatform(key.to_string()))
    }
}

impl std::fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A social link embedded in a user profile.
///
/// The icon is always derived from the platform, so a stored or submitted
/// icon can never disagree with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLink {
    pub platform: SocialPlatform,
    pub url: String,
}

impl SocialLink {
    pub fn new(platform: SocialPlatform, url: impl Into<String>) -> Self {
        Self {
            platform,
            url: url.into(),
        }
    }

    pub fn icon(&self) -> &'static str {
        self.platform.icon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_platforms() {
        assert_eq!(SocialPlatform::parse("github").unwrap(), SocialPlatform::Github);
        assert_eq!(SocialPlatform::parse("YouTube").unwrap(), SocialPlatform::Youtube);
        assert_eq!(SocialPlatform::parse(" tiktok ").unwrap(), SocialPlatform::Tiktok);
    }

    #[test]
    fn test_parse_unknown_platform() {
        let err = SocialPlatform::parse("myspace").unwrap_err();
        assert_eq!(err.code(), "INVALID_PLATFORM");
        assert!(SocialPlatform::parse("").is_err());
    }

    #[test]
    fn test_icon_follows_platform() {
        let link = SocialLink::new(SocialPlatform::Linkedin, "https://linkedin.com/in/jan");
        assert_eq!(link.icon(), r#"<i class="fab fa-linkedin"></i>"#);
        for platform in SocialPlatform::ALL {
            assert!(platform.icon().contains(&format!("fa-{}", platform.key())));
        }
    }

    #[test]
    fn test_serde_uses_key() {
        let json = serde_json::to_string(&SocialPlatform::Instagram).unwrap();
        assert_eq!(json, "\"instagram\"");
        let parsed: SocialPlatform = serde_json::from_str("\"facebook\"").unwrap();
        assert_eq!(parsed, SocialPlatform::Facebook);
    }
}

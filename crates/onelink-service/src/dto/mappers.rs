//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use onelink_core::{DiscordProfile, Link, SocialLink, SocialPlatform, User};

use super::responses::{
    DiscordProfileResponse, LinkResponse, PublicProfileResponse, SocialLinkResponse,
    SocialPlatformResponse, UserResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&SocialLink> for SocialLinkResponse {
    fn from(link: &SocialLink) -> Self {
        Self {
            platform: link.platform.key().to_string(),
            url: link.url.clone(),
            icon: link.icon().to_string(),
        }
    }
}

impl From<SocialPlatform> for SocialPlatformResponse {
    fn from(platform: SocialPlatform) -> Self {
        Self {
            key: platform.key(),
            name: platform.display_name(),
            icon: platform.icon(),
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            avatar: user.avatar.clone(),
            social_links: user.social_links.iter().map(SocialLinkResponse::from).collect(),
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Link Mappers
// ============================================================================

impl From<&Link> for LinkResponse {
    fn from(link: &Link) -> Self {
        Self {
            id: link.id.to_string(),
            title: link.title.clone(),
            url: link.url.clone(),
            description: link.description.clone(),
            user_id: link.user_id.to_string(),
            created_at: link.created_at,
            clicks: link.clicks,
            link_type: link.link_type,
            discord_id: link.discord_id.clone(),
        }
    }
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self::from(&link)
    }
}

// ============================================================================
// Public Profile Mappers
// ============================================================================

impl From<DiscordProfile> for DiscordProfileResponse {
    fn from(profile: DiscordProfile) -> Self {
        Self {
            avatar_url: profile.avatar_url(),
            tag: profile.tag(),
            id: profile.id,
            username: profile.username,
            banner: profile.banner,
            accent_color: profile.accent_color,
            status: profile.status,
        }
    }
}

impl PublicProfileResponse {
    /// Public view of a profile. Email and internal ids are left out.
    pub fn new(user: &User, links: &[Link], discord: Option<DiscordProfile>) -> Self {
        Self {
            username: user.username.clone(),
            bio: user.bio.clone(),
            avatar: user.avatar.clone(),
            social_links: user.social_links.iter().map(SocialLinkResponse::from).collect(),
            links: links.iter().map(LinkResponse::from).collect(),
            discord: discord.map(DiscordProfileResponse::from),
        }
    }
}

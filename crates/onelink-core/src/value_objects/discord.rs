//! Discord profile data used to enrich a public profile.
//!
//! Fetched per page view and never stored.

use serde::{Deserialize, Serialize};

pub const DISCORD_CDN_BASE: &str = "https://cdn.discordapp.com";
/// Image shown when the Discord user has no avatar
pub const DISCORD_FALLBACK_AVATAR: &str = "https://cdn.discordapp.com/embed/avatars/0.png";

/// Subset of a Discord user object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default, alias = "accentColor")]
    pub accent_color: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl DiscordProfile {
    /// 128px avatar URL, or the default avatar when no hash is set
    pub fn avatar_url(&self) -> String {
        match self.avatar.as_deref() {
            Some(hash) if !hash.is_empty() => {
                format!("{DISCORD_CDN_BASE}/avatars/{}/{hash}.png?size=128", self.id)
            }
            _ => DISCORD_FALLBACK_AVATAR.to_string(),
        }
    }

    /// `name#1234` for legacy accounts, the bare name for migrated ones
    pub fn tag(&self) -> String {
        if self.discriminator.is_empty() || self.discriminator == "0" {
            self.username.clone()
        } else {
            format!("{}#{}", self.username, self.discriminator)
        }
    }
}

//! Public profile service - what a visitor sees at `/{username}`

use onelink_core::{
    find_discord_link, normalize_handle, DiscordProfile, DomainError, LinkType,
};
use tracing::{debug, instrument, warn};

use crate::clients::DiscordError;
use crate::dto::PublicProfileResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct PublicProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PublicProfileService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load a profile by handle, enriched with Discord data when the owner
    /// has a Discord link.
    #[instrument(skip(self))]
    pub async fn view(&self, username: &str) -> ServiceResult<PublicProfileResponse> {
        let handle = normalize_handle(username);
        let user = self
            .ctx
            .user_repo()
            .find_by_username(&handle)
            .await?
            .ok_or(DomainError::ProfileNotFound(handle))?;

        let links = self.ctx.link_repo();
        let custom = links.find_by_owner_and_type(user.id, LinkType::Custom).await?;
        let discord_links = links.find_by_owner_and_type(user.id, LinkType::Discord).await?;

        let discord = match find_discord_link(&discord_links).and_then(|l| l.discord_id.as_deref()) {
            Some(discord_id) => self.fetch_discord(discord_id).await,
            None => None,
        };

        Ok(PublicProfileResponse::new(&user, &custom, discord))
    }

    /// Enrichment is best effort; the page renders without it
    async fn fetch_discord(&self, discord_id: &str) -> Option<DiscordProfile> {
        match self.ctx.discord().fetch_user(discord_id).await {
            Ok(profile) => Some(profile),
            Err(DiscordError::NotConfigured) => {
                debug!("Discord enrichment skipped: no bot token");
                None
            }
            Err(e) => {
                warn!(discord_id, error = %e, "Discord lookup failed");
                None
            }
        }
    }
}

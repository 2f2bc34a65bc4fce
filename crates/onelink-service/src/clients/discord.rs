//! Discord user lookup for public profile enrichment

use async_trait::async_trait;
use onelink_common::DiscordConfig;
use onelink_core::DiscordProfile;
use reqwest::{Client, StatusCode};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DiscordError {
    #[error("Discord bot token is not configured")]
    NotConfigured,

    #[error("Discord user {0} does not exist")]
    UnknownUser(String),

    #[error("Discord responded with status {0}")]
    Status(u16),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

#[async_trait]
pub trait DiscordClient: Send + Sync {
    /// Fetch the public profile of a Discord user id
    async fn fetch_user(&self, discord_id: &str) -> Result<DiscordProfile, DiscordError>;
}

/// Discord REST client authenticated with a bot token
pub struct HttpDiscordClient {
    client: Client,
    api_base: String,
    bot_token: Option<String>,
}

impl HttpDiscordClient {
    pub fn new(client: Client, api_base: impl Into<String>, bot_token: Option<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            bot_token,
        }
    }

    pub fn from_config(config: &DiscordConfig) -> Result<Self, reqwest::Error> {
        let client = super::create_service_client(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(client, &config.api_base, config.bot_token.clone()))
    }
}

#[async_trait]
impl DiscordClient for HttpDiscordClient {
    async fn fetch_user(&self, discord_id: &str) -> Result<DiscordProfile, DiscordError> {
        let Some(token) = self.bot_token.as_deref() else {
            return Err(DiscordError::NotConfigured);
        };

        tracing::debug!(discord_id, "Fetching Discord profile");

        let res = self
            .client
            .get(format!("{}/users/{discord_id}", self.api_base))
            .header(reqwest::header::AUTHORIZATION, format!("Bot {token}"))
            .send()
            .await?;

        match res.status() {
            StatusCode::NOT_FOUND => Err(DiscordError::UnknownUser(discord_id.to_string())),
            status if !status.is_success() => Err(DiscordError::Status(status.as_u16())),
            _ => Ok(res.json::<DiscordProfile>().await?),
        }
    }
}

impl std::fmt::Debug for HttpDiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDiscordClient")
            .field("api_base", &self.api_base)
            .field("enabled", &self.bot_token.is_some())
            .finish_non_exhaustive()
    }
}

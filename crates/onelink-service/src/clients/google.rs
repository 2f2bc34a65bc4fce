//! Google ID token verification through the tokeninfo endpoint

use std::time::Duration;

use async_trait::async_trait;
use onelink_common::GoogleConfig;
use reqwest::Client;
use serde::Deserialize;

/// Identity asserted by a verified ID token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Stable Google account id (`sub`)
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("ID token rejected")]
    Rejected,

    #[error("ID token was issued for another client")]
    AudienceMismatch,

    #[error("Google account email is not verified")]
    EmailNotVerified,

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError>;
}

/// tokeninfo reports booleans as strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => s.eq_ignore_ascii_case("true"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: Option<String>,
    email_verified: Option<Flag>,
    name: Option<String>,
}

impl TokenInfo {
    fn into_identity(self, client_id: &str) -> Result<VerifiedIdentity, IdentityError> {
        if self.aud != client_id {
            return Err(IdentityError::AudienceMismatch);
        }
        let verified = self.email_verified.as_ref().is_some_and(Flag::is_set);
        match self.email {
            Some(email) if verified => Ok(VerifiedIdentity {
                subject: self.sub,
                email,
                name: self.name,
            }),
            _ => Err(IdentityError::EmailNotVerified),
        }
    }
}

pub struct GoogleIdentityVerifier {
    client: Client,
    tokeninfo_url: String,
    client_id: String,
}

impl GoogleIdentityVerifier {
    pub fn new(client: Client, tokeninfo_url: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            client,
            tokeninfo_url: tokeninfo_url.into(),
            client_id: client_id.into(),
        }
    }

    /// None when no client id is configured
    pub fn from_config(config: &GoogleConfig) -> Result<Option<Self>, reqwest::Error> {
        let Some(client_id) = config.client_id.as_deref() else {
            return Ok(None);
        };
        let client = super::create_service_client(Duration::from_secs(config.timeout_secs))?;
        Ok(Some(Self::new(client, &config.tokeninfo_url, client_id)))
    }
}

#[async_trait]
impl IdentityVerifier for GoogleIdentityVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let res = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::debug!(status = res.status().as_u16(), "tokeninfo rejected ID token");
            return Err(IdentityError::Rejected);
        }

        res.json::<TokenInfo>().await?.into_identity(&self.client_id)
    }
}

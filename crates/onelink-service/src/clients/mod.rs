//! Outbound HTTP clients
//!
//! Calls are made once with a bounded timeout and never retried.

mod discord;
mod google;

use std::time::Duration;

use reqwest::{Client, Error as ReqwestError};

pub use discord::{DiscordClient, DiscordError, HttpDiscordClient};
pub use google::{GoogleIdentityVerifier, IdentityError, IdentityVerifier, VerifiedIdentity};

/// Shared client settings for third-party APIs
pub fn create_service_client(timeout: Duration) -> Result<Client, ReqwestError> {
    reqwest::ClientBuilder::new()
        .user_agent(concat!("OneLink/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(1))
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
}

//! Payloads of the non-dispatch ops

use serde::{Deserialize, Serialize};

/// op 10
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    pub const DEFAULT_HEARTBEAT_INTERVAL: u64 = 41_250;

    #[must_use]
    pub fn with_interval(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }
}

impl Default for HelloPayload {
    fn default() -> Self {
        Self::with_interval(Self::DEFAULT_HEARTBEAT_INTERVAL)
    }
}

/// op 2
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Access token, with or without a `Bearer ` prefix
    pub token: String,
}

impl IdentifyPayload {
    /// The bare token
    #[must_use]
    pub fn bearer_token(&self) -> &str {
        let token = self.token.trim();
        token.strip_prefix("Bearer ").unwrap_or(token).trim()
    }
}

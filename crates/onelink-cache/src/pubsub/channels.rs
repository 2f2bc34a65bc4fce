//! Pub/Sub channel naming

use onelink_core::Snowflake;

/// Prefix of a user's link change feed
pub const LINKS_CHANNEL_PREFIX: &str = "links:";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Link changes of one owner
    Links(Snowflake),
    /// Anything not following the naming scheme
    Custom(String),
}

impl PubSubChannel {
    #[must_use]
    pub fn links(user_id: Snowflake) -> Self {
        Self::Links(user_id)
    }

    /// Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Links(id) => format!("{LINKS_CHANNEL_PREFIX}{id}"),
            Self::Custom(name) => name.clone(),
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Self {
        name.strip_prefix(LINKS_CHANNEL_PREFIX)
            .and_then(|id| id.parse::<i64>().ok())
            .map_or_else(|| Self::Custom(name.to_string()), |id| Self::Links(Snowflake::new(id)))
    }

    /// Owner whose feed this is
    #[must_use]
    pub fn owner(&self) -> Option<Snowflake> {
        match self {
            Self::Links(id) => Some(*id),
            Self::Custom(_) => None,
        }
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

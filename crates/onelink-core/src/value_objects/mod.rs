//! Value objects - immutable types that represent domain concepts

mod discord;
mod handle;
mod snowflake;

pub use discord::{DiscordProfile, DISCORD_CDN_BASE, DISCORD_FALLBACK_AVATAR};
pub use handle::{normalize_handle, validate_username, USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};

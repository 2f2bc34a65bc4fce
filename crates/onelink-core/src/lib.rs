//! # onelink-core
//!
//! Domain layer for OneLink: accounts, profiles, links, the social platform
//! catalog, Discord enrichment values, routing rules, repository traits and
//! link change events. No infrastructure dependencies live here.

pub mod entities;
pub mod error;
pub mod events;
pub mod routing;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    find_discord_link, sort_newest_first, Account, Link, LinkType, NewLink, SocialLink,
    SocialPlatform, User,
};
pub use error::DomainError;
pub use events::{LinkEvent, LinkEventKind};
pub use routing::{resolve_route, RouteDecision, Screen};
pub use traits::{
    AccountRepository, LinkEventPublisher, LinkRepository, RepoResult, SessionStore,
    UserRepository,
};
pub use value_objects::{
    normalize_handle, validate_username, DiscordProfile, Snowflake, SnowflakeGenerator,
    SnowflakeParseError, DISCORD_FALLBACK_AVATAR, USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH,
};

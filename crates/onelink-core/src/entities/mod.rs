//! Domain entities - core business objects

mod account;
mod link;
mod social;
mod user;

pub use account::Account;
pub use link::{find_discord_link, sort_newest_first, Link, LinkType, NewLink};
pub use social::{SocialLink, SocialPlatform};
pub use user::User;

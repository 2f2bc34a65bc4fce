//! Repository and port traits implemented by the infrastructure crates

mod ports;
mod repositories;

pub use ports::{LinkEventPublisher, SessionStore};
pub use repositories::{AccountRepository, LinkRepository, RepoResult, UserRepository};

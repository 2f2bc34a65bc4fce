//! Mappers between database models and domain entities
//!
//! Rows are validated here: a stored value the domain cannot represent
//! surfaces as [`onelink_core::DomainError::CorruptRecord`].

mod account;
mod link;
mod user;

pub use link::LinkInsert;
pub use user::social_links_to_json;

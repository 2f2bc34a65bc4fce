//! Database models - direct mappings to database tables

mod account;
mod link;
mod user;

pub use account::AccountModel;
pub use link::LinkModel;
pub use user::{SocialLinkRecord, UserModel};

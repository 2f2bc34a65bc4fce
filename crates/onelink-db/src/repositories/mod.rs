//! PostgreSQL repository implementations

mod account;
mod error;
mod link;
mod user;

pub use account::PgAccountRepository;
pub use error::{map_db_error, map_unique_violation};
pub use link::PgLinkRepository;
pub use user::PgUserRepository;

//! # onelink-db
//!
//! PostgreSQL implementations of the `onelink-core` repository traits, via SQLx.
//!
//! - connection pool and migrations
//! - `FromRow` models
//! - model -> entity mappers that validate stored JSON and enums
//! - repositories for accounts, profiles and links
//!
//! ```rust,ignore
//! use onelink_db::{create_pool, DatabaseConfig, PgLinkRepository};
//!
//! let pool = create_pool(&DatabaseConfig::from_env()).await?;
//! let links = PgLinkRepository::new(pool);
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgAccountRepository, PgLinkRepository, PgUserRepository};

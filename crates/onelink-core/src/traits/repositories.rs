//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{Account, Link, LinkType, User};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Account Repository
// ============================================================================

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Account>>;

    /// Find account by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>>;

    /// Find account by its Google subject
    async fn find_by_google_subject(&self, subject: &str) -> RepoResult<Option<Account>>;

    /// Check if email is already registered
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create an account and, when given, its profile in one transaction.
    ///
    /// A unique violation on the handle is reported as
    /// [`DomainError::UsernameTaken`], on the email as
    /// [`DomainError::EmailAlreadyExists`].
    async fn create(
        &self,
        account: &Account,
        password_hash: Option<&str>,
        profile: Option<&User>,
    ) -> RepoResult<()>;

    /// Attach a Google subject to an existing account
    async fn link_google_subject(&self, id: Snowflake, subject: &str) -> RepoResult<()>;

    /// Get password hash for authentication (None for federated-only accounts)
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;
}

// ============================================================================
// User (profile) Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find profile by owner ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find profile by handle. The handle must already be normalized.
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Check if a normalized handle is taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Create a profile for an existing account
    async fn create(&self, user: &User) -> RepoResult<()>;

    /// Overwrite bio, avatar and social links
    async fn update_profile(&self, user: &User) -> RepoResult<()>;
}

// ============================================================================
// Link Repository
// ============================================================================

#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Find link by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Link>>;

    /// All links owned by a user, newest first
    async fn find_by_owner(&self, user_id: Snowflake) -> RepoResult<Vec<Link>>;

    /// Links of one type owned by a user, newest first
    async fn find_by_owner_and_type(
        &self,
        user_id: Snowflake,
        link_type: LinkType,
    ) -> RepoResult<Vec<Link>>;

    /// Create a new link
    async fn create(&self, link: &Link) -> RepoResult<()>;

    /// Delete a link, returning whether a row was removed
    async fn delete(&self, id: Snowflake) -> RepoResult<bool>;

    /// Add one click and return the link as stored afterwards
    async fn increment_clicks(&self, id: Snowflake) -> RepoResult<Option<Link>>;
}

//! Non-database ports: session storage and the link change feed

use async_trait::async_trait;

use crate::events::LinkEvent;
use crate::traits::RepoResult;
use crate::value_objects::Snowflake;

/// Refresh token sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Remember a refresh token id for a user
    async fn store(&self, token_id: &str, user_id: Snowflake) -> RepoResult<()>;

    /// Owner of a live refresh token, None when expired or revoked
    async fn validate(&self, token_id: &str) -> RepoResult<Option<Snowflake>>;

    /// Revoke one token, returning whether it existed
    async fn revoke(&self, token_id: &str) -> RepoResult<bool>;

    /// Revoke every token of a user, returning how many were removed
    async fn revoke_all_for_user(&self, user_id: Snowflake) -> RepoResult<u32>;
}

/// Publishes link changes to the owner's feed
#[async_trait]
pub trait LinkEventPublisher: Send + Sync {
    /// Publish one event, returning the number of live receivers
    async fn publish(&self, event: &LinkEvent) -> RepoResult<usize>;
}

//! Refresh token sessions in Redis
//!
//! Each session is a `refresh_token:{session_id}` key expiring with the
//! token, plus membership in the owner's `user_tokens:{user_id}` set so
//! every session of a user can be revoked at once.

use async_trait::async_trait;
use onelink_core::{DomainError, RepoResult, SessionStore, Snowflake};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use crate::pool::{RedisPool, RedisResult};

const REFRESH_TOKEN_PREFIX: &str = "refresh_token:";
const USER_TOKENS_PREFIX: &str = "user_tokens:";

/// 7 days
const DEFAULT_REFRESH_TOKEN_TTL: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenData {
    pub user_id: Snowflake,
    /// Unix seconds
    pub created_at: i64,
}

impl RefreshTokenData {
    #[must_use]
    pub fn new(user_id: Snowflake) -> Self {
        Self {
            user_id,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

#[derive(Clone)]
pub struct RefreshTokenStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RefreshTokenStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            ttl_seconds: DEFAULT_REFRESH_TOKEN_TTL,
        }
    }

    /// Sessions expire together with the refresh token they back
    #[must_use]
    pub fn with_ttl(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    fn key(token_id: &str) -> String {
        format!("{REFRESH_TOKEN_PREFIX}{token_id}")
    }

    fn user_key(user_id: Snowflake) -> String {
        format!("{USER_TOKENS_PREFIX}{user_id}")
    }

    async fn put(&self, token_id: &str, user_id: Snowflake) -> RedisResult<()> {
        let data = RefreshTokenData::new(user_id);
        self.pool.set(&Self::key(token_id), &data, Some(self.ttl_seconds)).await?;

        let user_key = Self::user_key(user_id);
        let mut conn = self.pool.get().await?;
        conn.sadd::<_, _, ()>(&user_key, token_id).await?;
        drop(conn);
        self.pool.expire(&user_key, self.ttl_seconds).await?;

        tracing::debug!(token_id = %token_id, user_id = %user_id, "Stored refresh session");
        Ok(())
    }

    async fn remove(&self, token_id: &str) -> RedisResult<bool> {
        let key = Self::key(token_id);
        if let Some(data) = self.pool.get_value::<RefreshTokenData>(&key).await? {
            let mut conn = self.pool.get().await?;
            conn.srem::<_, _, ()>(Self::user_key(data.user_id), token_id).await?;
        }

        let deleted = self.pool.delete(&key).await?;
        if deleted {
            tracing::debug!(token_id = %token_id, "Revoked refresh session");
        }
        Ok(deleted)
    }

    async fn remove_all(&self, user_id: Snowflake) -> RedisResult<u32> {
        let user_key = Self::user_key(user_id);
        let mut conn = self.pool.get().await?;
        let token_ids: Vec<String> = conn.smembers(&user_key).await?;
        drop(conn);

        let keys: Vec<String> = token_ids.iter().map(|id| Self::key(id)).collect();
        let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let removed = self.pool.delete_many(&key_refs).await?;
        self.pool.delete(&user_key).await?;

        let removed = u32::try_from(removed).unwrap_or_default();
        tracing::info!(user_id = %user_id, count = removed, "Revoked all refresh sessions");
        Ok(removed)
    }
}

#[async_trait]
impl SessionStore for RefreshTokenStore {
    async fn store(&self, token_id: &str, user_id: Snowflake) -> RepoResult<()> {
        self.put(token_id, user_id).await.map_err(Into::into)
    }

    async fn validate(&self, token_id: &str) -> RepoResult<Option<Snowflake>> {
        let data: Option<RefreshTokenData> = self
            .pool
            .get_value(&Self::key(token_id))
            .await
            .map_err(DomainError::from)?;
        Ok(data.map(|d| d.user_id))
    }

    async fn revoke(&self, token_id: &str) -> RepoResult<bool> {
        self.remove(token_id).await.map_err(Into::into)
    }

    async fn revoke_all_for_user(&self, user_id: Snowflake) -> RepoResult<u32> {
        self.remove_all(user_id).await.map_err(Into::into)
    }
}

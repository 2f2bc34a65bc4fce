//! PostgreSQL implementation of AccountRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use onelink_core::{Account, AccountRepository, DomainError, RepoResult, Snowflake, User};

use crate::mappers::social_links_to_json;
use crate::models::AccountModel;

use super::error::{conflict_for, map_db_error, map_unique_violation};

/// PostgreSQL implementation of `AccountRepository`
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Account>> {
        let result = sqlx::query_as::<_, AccountModel>(
            r"
            SELECT id, email, display_name, google_subject, created_at
            FROM accounts
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Account::from))
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let result = sqlx::query_as::<_, AccountModel>(
            r"
            SELECT id, email, display_name, google_subject, created_at
            FROM accounts
            WHERE lower(email) = lower($1)
            ",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Account::from))
    }

    #[instrument(skip(self))]
    async fn find_by_google_subject(&self, subject: &str) -> RepoResult<Option<Account>> {
        let result = sqlx::query_as::<_, AccountModel>(
            r"
            SELECT id, email, display_name, google_subject, created_at
            FROM accounts
            WHERE google_subject = $1
            ",
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Account::from))
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE lower(email) = lower($1))",
        )
        .bind(email.trim())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.0)
    }

    #[instrument(skip(self, account, password_hash, profile), fields(account_id = %account.id))]
    async fn create(
        &self,
        account: &Account,
        password_hash: Option<&str>,
        profile: Option<&User>,
    ) -> RepoResult<()> {
        let username = profile.map(|p| p.username.as_str()).unwrap_or_default();
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO accounts (id, email, password_hash, display_name, google_subject, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ",
        )
        .bind(account.id.into_inner())
        .bind(&account.email)
        .bind(password_hash)
        .bind(account.display_name.as_deref())
        .bind(account.google_subject.as_deref())
        .bind(account.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, |c| conflict_for(c, username)))?;

        if let Some(user) = profile {
            sqlx::query(
                r"
                INSERT INTO users (id, username, email, bio, avatar, social_links, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ",
            )
            .bind(user.id.into_inner())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.bio)
            .bind(&user.avatar)
            .bind(social_links_to_json(&user.social_links))
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, |c| conflict_for(c, username)))?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, subject))]
    async fn link_google_subject(&self, id: Snowflake, subject: &str) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE accounts SET google_subject = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(subject)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AccountNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        let result: Option<(Option<String>,)> =
            sqlx::query_as("SELECT password_hash FROM accounts WHERE id = $1")
                .bind(id.into_inner())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        match result {
            Some((hash,)) => Ok(hash),
            None => Err(DomainError::AccountNotFound(id)),
        }
    }
}

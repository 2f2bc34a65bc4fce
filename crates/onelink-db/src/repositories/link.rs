//! PostgreSQL implementation of LinkRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use onelink_core::{Link, LinkRepository, LinkType, RepoResult, Snowflake};

use crate::mappers::LinkInsert;
use crate::models::LinkModel;

use super::error::map_db_error;

/// PostgreSQL implementation of `LinkRepository`
#[derive(Clone)]
pub struct PgLinkRepository {
    pool: PgPool,
}

impl PgLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_links(models: Vec<LinkModel>) -> RepoResult<Vec<Link>> {
    models.into_iter().map(Link::try_from).collect()
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Link>> {
        let result = sqlx::query_as::<_, LinkModel>(
            r"
            SELECT id, user_id, title, url, description, link_type, discord_id, clicks, created_at
            FROM links
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Link::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_owner(&self, user_id: Snowflake) -> RepoResult<Vec<Link>> {
        let models = sqlx::query_as::<_, LinkModel>(
            r"
            SELECT id, user_id, title, url, description, link_type, discord_id, clicks, created_at
            FROM links
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_links(models)
    }

    #[instrument(skip(self))]
    async fn find_by_owner_and_type(
        &self,
        user_id: Snowflake,
        link_type: LinkType,
    ) -> RepoResult<Vec<Link>> {
        let models = sqlx::query_as::<_, LinkModel>(
            r"
            SELECT id, user_id, title, url, description, link_type, discord_id, clicks, created_at
            FROM links
            WHERE user_id = $1 AND link_type = $2
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id.into_inner())
        .bind(link_type.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        into_links(models)
    }

    #[instrument(skip(self, link), fields(link_id = %link.id, user_id = %link.user_id))]
    async fn create(&self, link: &Link) -> RepoResult<()> {
        let insert = LinkInsert::from(link);

        sqlx::query(
            r"
            INSERT INTO links (id, user_id, title, url, description, link_type, discord_id, clicks, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(insert.id)
        .bind(insert.user_id)
        .bind(insert.title)
        .bind(insert.url)
        .bind(insert.description)
        .bind(insert.link_type)
        .bind(insert.discord_id)
        .bind(insert.clicks)
        .bind(link.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn increment_clicks(&self, id: Snowflake) -> RepoResult<Option<Link>> {
        // Single statement so concurrent opens never lose a click
        let result = sqlx::query_as::<_, LinkModel>(
            r"
            UPDATE links
            SET clicks = clicks + 1
            WHERE id = $1
            RETURNING id, user_id, title, url, description, link_type, discord_id, clicks, created_at
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Link::try_from).transpose()
    }
}

//! Link service - creation, listing, deletion and click counting
//!
//! Every successful mutation publishes exactly one event on the owner's feed.

use onelink_core::{DomainError, Link, LinkEvent, NewLink, Snowflake};
use tracing::{info, instrument};

use crate::dto::{CreateLinkRequest, LinkResponse, OpenLinkResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::validation::{check_max_chars, check_url, DESCRIPTION_MAX_LENGTH, LINK_TITLE_MAX_LENGTH};

pub struct LinkService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LinkService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a link owned by the caller
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        user_id: Snowflake,
        request: CreateLinkRequest,
    ) -> ServiceResult<LinkResponse> {
        let new_link = parse_new_link(request)?;

        if self.ctx.user_repo().find_by_id(user_id).await?.is_none() {
            return Err(DomainError::ProfileNotFound(user_id.to_string()).into());
        }

        let link = Link::create(self.ctx.generate_id(), user_id, new_link);
        self.ctx.link_repo().create(&link).await?;

        info!(link_id = %link.id, user_id = %user_id, kind = link.link_type.as_str(), "Link created");
        self.ctx
            .publish_link_event(LinkEvent::created(link.id, user_id))
            .await;

        Ok(LinkResponse::from(link))
    }

    /// The caller's links, newest first
    #[instrument(skip(self))]
    pub async fn list(&self, user_id: Snowflake) -> ServiceResult<Vec<LinkResponse>> {
        let links = self.ctx.link_repo().find_by_owner(user_id).await?;
        Ok(links.iter().map(LinkResponse::from).collect())
    }

    /// Delete one of the caller's links
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Snowflake, link_id: Snowflake) -> ServiceResult<()> {
        let link = self
            .ctx
            .link_repo()
            .find_by_id(link_id)
            .await?
            .ok_or(DomainError::LinkNotFound(link_id))?;

        if !link.is_owned_by(user_id) {
            return Err(DomainError::NotLinkOwner.into());
        }

        if !self.ctx.link_repo().delete(link_id).await? {
            // Deleted concurrently; the other delete already published
            return Err(DomainError::LinkNotFound(link_id).into());
        }

        info!(link_id = %link_id, user_id = %user_id, "Link deleted");
        self.ctx
            .publish_link_event(LinkEvent::deleted(link_id, user_id))
            .await;
        Ok(())
    }

    /// Count a click and return where to go. Anyone may open a link.
    #[instrument(skip(self))]
    pub async fn open(&self, link_id: Snowflake) -> ServiceResult<OpenLinkResponse> {
        let link = self
            .ctx
            .link_repo()
            .increment_clicks(link_id)
            .await?
            .ok_or(DomainError::LinkNotFound(link_id))?;

        self.ctx
            .publish_link_event(LinkEvent::updated(link.id, link.user_id))
            .await;

        Ok(OpenLinkResponse {
            url: link.url,
            clicks: link.clicks,
        })
    }
}

fn parse_new_link(request: CreateLinkRequest) -> Result<NewLink, DomainError> {
    match request {
        CreateLinkRequest::Discord { discord_id } => NewLink::discord(&discord_id),
        CreateLinkRequest::Custom {
            title,
            url,
            description,
        } => {
            let new_link = NewLink::custom(&title, &url, description.as_deref())?;
            if let NewLink::Custom {
                title,
                url,
                description,
            } = &new_link
            {
                check_max_chars("title", title, LINK_TITLE_MAX_LENGTH)?;
                check_url("url", url)?;
                check_max_chars("description", description, DESCRIPTION_MAX_LENGTH)?;
            }
            Ok(new_link)
        }
    }
}

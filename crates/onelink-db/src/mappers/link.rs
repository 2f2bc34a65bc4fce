//! Link entity <-> model mapper

use onelink_core::{DomainError, Link, LinkType, Snowflake};

use crate::models::LinkModel;

impl TryFrom<LinkModel> for Link {
    type Error = DomainError;

    fn try_from(model: LinkModel) -> Result<Self, Self::Error> {
        let link_type = LinkType::parse(&model.link_type)?;

        if (link_type == LinkType::Discord) != model.discord_id.is_some() {
            return Err(DomainError::CorruptRecord(format!(
                "link {} has type {} but discord id {:?}",
                model.id, model.link_type, model.discord_id
            )));
        }

        Ok(Link {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            title: model.title,
            url: model.url,
            description: model.description,
            link_type,
            discord_id: model.discord_id,
            clicks: model.clicks,
            created_at: model.created_at,
        })
    }
}

/// Bind values for inserting a link
#[derive(Debug)]
pub struct LinkInsert<'a> {
    pub id: i64,
    pub user_id: i64,
    pub title: &'a str,
    pub url: &'a str,
    pub description: &'a str,
    pub link_type: &'static str,
    pub discord_id: Option<&'a str>,
    pub clicks: i64,
}

impl<'a> From<&'a Link> for LinkInsert<'a> {
    fn from(link: &'a Link) -> Self {
        Self {
            id: link.id.into_inner(),
            user_id: link.user_id.into_inner(),
            title: &link.title,
            url: &link.url,
            description: &link.description,
            link_type: link.link_type.as_str(),
            discord_id: link.discord_id.as_deref(),
            clicks: link.clicks,
        }
    }
}

//! Link change events
//!
//! Subscribers of an owner's feed react to any event by reloading the full
//! list, so events only identify what changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkEventKind {
    LinkCreated,
    LinkUpdated,
    LinkDeleted,
}

impl LinkEventKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LinkCreated => "LINK_CREATED",
            Self::LinkUpdated => "LINK_UPDATED",
            Self::LinkDeleted => "LINK_DELETED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEvent {
    #[serde(rename = "type")]
    pub kind: LinkEventKind,
    pub link_id: Snowflake,
    /// Owner of the link; selects the feed
    pub user_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

impl LinkEvent {
    pub fn new(kind: LinkEventKind, link_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            kind,
            link_id,
            user_id,
            timestamp: Utc::now(),
        }
    }

    pub fn created(link_id: Snowflake, user_id: Snowflake) -> Self {
        Self::new(LinkEventKind::LinkCreated, link_id, user_id)
    }

    pub fn updated(link_id: Snowflake, user_id: Snowflake) -> Self {
        Self::new(LinkEventKind::LinkUpdated, link_id, user_id)
    }

    pub fn deleted(link_id: Snowflake, user_id: Snowflake) -> Self {
        Self::new(LinkEventKind::LinkDeleted, link_id, user_id)
    }

    pub fn event_type(&self) -> &'static str {
        self.kind.as_str()
    }
}

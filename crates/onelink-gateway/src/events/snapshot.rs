//! `LINKS_SNAPSHOT` dispatch
//!
//! The gateway never sends diffs. Every change on an owner's feed is answered
//! with the full list, newest first, in the same shape `GET /links` returns.

use onelink_core::{LinkEventKind, Snowflake};
use onelink_service::dto::LinkResponse;
use serde::Serialize;
use serde_json::Value;

/// Event name in the `t` field
pub const LINKS_SNAPSHOT: &str = "LINKS_SNAPSHOT";

#[derive(Debug, Clone, Serialize)]
pub struct LinksSnapshotEvent {
    pub user_id: Snowflake,
    pub links: Vec<LinkResponse>,
    /// Change that triggered this snapshot; absent for the one after Identify
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<LinkEventKind>,
}

impl LinksSnapshotEvent {
    #[must_use]
    pub fn new(user_id: Snowflake, links: Vec<LinkResponse>, cause: Option<LinkEventKind>) -> Self {
        Self {
            user_id,
            links,
            cause,
        }
    }

    /// `d` of the dispatch frame
    pub fn to_data(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

//! Reading and delivering link list snapshots

use std::sync::Arc;

use onelink_core::{sort_newest_first, DomainError, LinkEventKind, LinkRepository, Snowflake};
use onelink_service::dto::LinkResponse;

use crate::connection::{Connection, ConnectionManager, SendError};
use crate::events::LinksSnapshotEvent;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to load links: {0}")]
    Load(#[from] DomainError),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct SnapshotLoader {
    link_repo: Arc<dyn LinkRepository>,
}

impl SnapshotLoader {
    pub fn new(link_repo: Arc<dyn LinkRepository>) -> Self {
        Self { link_repo }
    }

    /// The owner's links, newest first
    pub async fn load(&self, user_id: Snowflake) -> Result<Vec<LinkResponse>, DomainError> {
        let mut links = self.link_repo.find_by_owner(user_id).await?;
        sort_newest_first(&mut links);
        Ok(links.iter().map(LinkResponse::from).collect())
    }

    /// Read the owner's list once and queue it on each connection.
    ///
    /// Returns how many connections got it. A connection that already holds
    /// a newer snapshot, or whose writer is gone or backed up, is skipped
    /// without waiting on it.
    pub async fn deliver(
        &self,
        manager: &ConnectionManager,
        connections: &[Arc<Connection>],
        user_id: Snowflake,
        cause: Option<LinkEventKind>,
    ) -> Result<usize, SnapshotError> {
        if connections.is_empty() {
            return Ok(0);
        }

        let ticket = manager.next_snapshot_ticket();
        let links = self.load(user_id).await?;
        let link_count = links.len();
        let data = LinksSnapshotEvent::new(user_id, links, cause).to_data()?;

        let mut sent = 0;
        for connection in connections {
            match connection.send_snapshot(ticket, &data) {
                Ok(true) => sent += 1,
                Ok(false) => tracing::trace!(
                    session_id = %connection.session_id(),
                    ticket,
                    "Newer snapshot already queued"
                ),
                Err(SendError::Closed) => tracing::debug!(
                    session_id = %connection.session_id(),
                    "Connection closed before snapshot"
                ),
                Err(SendError::Full) => tracing::debug!(
                    session_id = %connection.session_id(),
                    "Connection backed up, snapshot dropped"
                ),
            }
        }

        tracing::trace!(user_id = %user_id, links = link_count, sent, "Snapshot delivered");
        Ok(sent)
    }
}

impl std::fmt::Debug for SnapshotLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotLoader").finish_non_exhaustive()
    }
}

//! In-memory stand-ins for Postgres and Redis

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use onelink_cache::SubscriberResult;
use onelink_common::JwtService;
use onelink_core::{
    DomainError, Link, LinkRepository, LinkType, NewLink, RepoResult, Snowflake,
};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::broadcast::{LinkFeeds, SnapshotLoader};
use crate::connection::{ConnectionManager, Outbound};
use crate::protocol::GatewayMessage;
use crate::server::GatewayState;

pub const TEST_SECRET: &str = "gateway-test-secret-key-0123456789";

#[derive(Default)]
pub struct MemoryLinks {
    links: Mutex<Vec<Link>>,
    pub offline: AtomicBool,
}

impl MemoryLinks {
    pub fn add(&self, id: i64, owner: i64, title: &str) -> Link {
        let link = Link::create(
            Snowflake::new(id),
            Snowflake::new(owner),
            NewLink::custom(title, "https://example.com", None).unwrap(),
        );
        self.links.lock().push(link.clone());
        link
    }

    fn check(&self) -> RepoResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LinkRepository for MemoryLinks {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Link>> {
        self.check()?;
        Ok(self.links.lock().iter().find(|l| l.id == id).cloned())
    }

    async fn find_by_owner(&self, user_id: Snowflake) -> RepoResult<Vec<Link>> {
        self.check()?;
        Ok(self
            .links
            .lock()
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_owner_and_type(
        &self,
        user_id: Snowflake,
        link_type: LinkType,
    ) -> RepoResult<Vec<Link>> {
        let mut links = self.find_by_owner(user_id).await?;
        links.retain(|l| l.link_type == link_type);
        Ok(links)
    }

    async fn create(&self, link: &Link) -> RepoResult<()> {
        self.check()?;
        self.links.lock().push(link.clone());
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        self.check()?;
        let mut links = self.links.lock();
        let before = links.len();
        links.retain(|l| l.id != id);
        Ok(links.len() != before)
    }

    async fn increment_clicks(&self, id: Snowflake) -> RepoResult<Option<Link>> {
        self.check()?;
        Ok(self.links.lock().iter_mut().find(|l| l.id == id).map(|l| {
            l.clicks += 1;
            l.clone()
        }))
    }
}

/// Follow/unfollow calls in order, `true` for follow
#[derive(Default)]
pub struct RecordingFeeds {
    pub calls: Mutex<Vec<(Snowflake, bool)>>,
}

#[async_trait]
impl LinkFeeds for RecordingFeeds {
    async fn follow(&self, user_id: Snowflake) -> SubscriberResult<()> {
        self.calls.lock().push((user_id, true));
        Ok(())
    }

    async fn unfollow(&self, user_id: Snowflake) -> SubscriberResult<()> {
        self.calls.lock().push((user_id, false));
        Ok(())
    }
}

pub struct Harness {
    pub state: GatewayState,
    pub links: Arc<MemoryLinks>,
    pub feeds: Arc<RecordingFeeds>,
}

impl Harness {
    pub fn new() -> Self {
        let links = Arc::new(MemoryLinks::default());
        let feeds = Arc::new(RecordingFeeds::default());
        let state = GatewayState::new(
            ConnectionManager::new_shared(),
            Arc::clone(&feeds) as Arc<dyn LinkFeeds>,
            Arc::new(SnapshotLoader::new(Arc::clone(&links) as Arc<dyn LinkRepository>)),
            Arc::new(JwtService::new(TEST_SECRET, 900, 604_800)),
            Duration::from_millis(41_250),
        );
        Self {
            state,
            links,
            feeds,
        }
    }

    pub fn access_token(&self, user_id: i64) -> String {
        self.state
            .jwt_service()
            .issue(Snowflake::new(user_id), "sid")
            .unwrap()
            .access_token
    }

    pub fn connect(&self, session_id: &str) -> mpsc::Receiver<Outbound> {
        let (tx, rx) = mpsc::channel(16);
        self.state
            .connection_manager()
            .add_connection(session_id.to_string(), tx);
        rx
    }
}

/// Next queued frame, failing on a close or an empty queue
pub fn next_message(rx: &mut mpsc::Receiver<Outbound>) -> GatewayMessage {
    match rx.try_recv() {
        Ok(Outbound::Message(message)) => message,
        other => panic!("expected a message, got {other:?}"),
    }
}

//! Gateway state shared by every socket task

use std::sync::Arc;
use std::time::Duration;

use onelink_common::JwtService;

use crate::broadcast::{EventDispatcher, LinkFeeds, SnapshotLoader};
use crate::connection::ConnectionManager;

#[derive(Clone)]
pub struct GatewayState {
    connection_manager: Arc<ConnectionManager>,
    feeds: Arc<dyn LinkFeeds>,
    snapshots: Arc<SnapshotLoader>,
    jwt_service: Arc<JwtService>,
    heartbeat_interval: Duration,
    dispatcher: Option<Arc<EventDispatcher>>,
}

impl GatewayState {
    pub fn new(
        connection_manager: Arc<ConnectionManager>,
        feeds: Arc<dyn LinkFeeds>,
        snapshots: Arc<SnapshotLoader>,
        jwt_service: Arc<JwtService>,
        heartbeat_interval: Duration,
    ) -> Self {
        Self {
            connection_manager,
            feeds,
            snapshots,
            jwt_service,
            heartbeat_interval,
            dispatcher: None,
        }
    }

    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: Arc<EventDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    pub fn feeds(&self) -> &dyn LinkFeeds {
        self.feeds.as_ref()
    }

    pub fn snapshots(&self) -> &SnapshotLoader {
        &self.snapshots
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Interval announced in HELLO
    pub fn heartbeat_interval(&self) -> Duration {
        self.heartbeat_interval
    }

    /// Sockets are closed after this long without a heartbeat
    pub fn heartbeat_timeout(&self) -> Duration {
        self.heartbeat_interval * 3 / 2
    }

    pub fn dispatcher_running(&self) -> bool {
        self.dispatcher.as_ref().is_some_and(|d| d.is_running())
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("connection_manager", &self.connection_manager)
            .field("heartbeat_interval", &self.heartbeat_interval)
            .finish_non_exhaustive()
    }
}

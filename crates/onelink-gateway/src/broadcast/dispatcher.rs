//! Event dispatcher
//!
//! Consumes the subscriber's fan-out channel and answers every link event
//! with a fresh snapshot for that owner's sockets. Messages are handled one
//! at a time, so snapshots for one owner go out in feed order. Falling behind
//! the channel loses events, so every identified socket is resynced.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use onelink_cache::ReceivedMessage;
use tokio::sync::broadcast;

use super::SnapshotLoader;
use crate::connection::ConnectionManager;

pub struct EventDispatcher {
    connection_manager: Arc<ConnectionManager>,
    snapshots: Arc<SnapshotLoader>,
    running: AtomicBool,
}

impl EventDispatcher {
    pub fn new(connection_manager: Arc<ConnectionManager>, snapshots: Arc<SnapshotLoader>) -> Self {
        Self {
            connection_manager,
            snapshots,
            running: AtomicBool::new(false),
        }
    }

    /// Spawn the dispatch loop over `receiver`
    pub fn start(self: Arc<Self>, receiver: broadcast::Receiver<ReceivedMessage>) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Event dispatcher is already running");
            return;
        }

        tokio::spawn(async move { self.run(receiver).await });
        tracing::info!("Event dispatcher started");
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run(&self, mut receiver: broadcast::Receiver<ReceivedMessage>) {
        while self.is_running() {
            match receiver.recv().await {
                Ok(msg) => {
                    self.handle_message(msg).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "Event dispatcher lagged behind");
                    self.resync_all().await;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::warn!("Subscriber channel closed");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Event dispatcher loop ended");
    }

    /// Push a snapshot to the sockets of the feed's owner.
    ///
    /// Returns how many sockets received one.
    pub async fn handle_message(&self, msg: ReceivedMessage) -> usize {
        let Some(owner) = msg.channel.owner() else {
            tracing::debug!(channel = %msg.channel, "Message on unknown channel, ignoring");
            return 0;
        };
        let Some(event) = msg.event else {
            tracing::debug!(channel = %msg.channel, "Payload is not a link event, ignoring");
            return 0;
        };
        if event.user_id != owner {
            tracing::warn!(
                channel = %msg.channel,
                user_id = %event.user_id,
                "Event published on another owner's feed, ignoring"
            );
            return 0;
        }

        let connections = self.connection_manager.get_user_connections(owner);
        if connections.is_empty() {
            return 0;
        }

        match self
            .snapshots
            .deliver(&self.connection_manager, &connections, owner, Some(event.kind))
            .await
        {
            Ok(sent) => {
                tracing::debug!(
                    user_id = %owner,
                    event_type = event.event_type(),
                    sent,
                    "Snapshot dispatched"
                );
                sent
            }
            Err(e) => {
                tracing::error!(user_id = %owner, error = %e, "Failed to build snapshot");
                0
            }
        }
    }
}

impl EventDispatcher {
    /// Send a fresh snapshot to every identified socket.
    ///
    /// Returns how many sockets received one.
    pub async fn resync_all(&self) -> usize {
        let mut sent = 0;
        for user_id in self.connection_manager.identified_users() {
            let connections = self.connection_manager.get_user_connections(user_id);
            match self
                .snapshots
                .deliver(&self.connection_manager, &connections, user_id, None)
                .await
            {
                Ok(n) => sent += n,
                Err(e) => {
                    tracing::error!(user_id = %user_id, error = %e, "Failed to resync snapshot");
                }
            }
        }
        tracing::info!(sent, "Resynced identified sockets");
        sent
    }
}

impl Drop for EventDispatcher {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

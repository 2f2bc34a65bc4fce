//! A single WebSocket connection
//!
//! The socket itself is owned by the writer task in the server handler; a
//! `Connection` only holds the sending half of its outbound queue. Queuing
//! never waits: a socket whose queue is full is marked as overflowed and
//! the handler drops it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use onelink_core::Snowflake;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, Notify};
use tokio::time::Instant;

use crate::events::LINKS_SNAPSHOT;
use crate::protocol::{CloseCode, GatewayMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionState {
    /// Waiting for Identify
    Connecting,
    Connected,
    Disconnected,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SendError {
    #[error("writer is gone")]
    Closed,

    /// The writer fell behind; the connection is being dropped
    #[error("outbound queue is full")]
    Full,
}

/// What the writer task puts on the wire
#[derive(Debug, Clone)]
pub enum Outbound {
    Message(GatewayMessage),
    /// Send a close frame and stop writing
    Close(CloseCode),
}

pub struct Connection {
    session_id: String,
    user_id: RwLock<Option<Snowflake>>,
    state: RwLock<ConnectionState>,
    sender: mpsc::Sender<Outbound>,
    /// Last dispatch sequence number sent
    sequence: AtomicU64,
    /// Ticket of the newest snapshot queued on this connection
    snapshot_ticket: Mutex<u64>,
    overflowed: AtomicBool,
    overflow: Notify,
    last_heartbeat: Mutex<Instant>,
    created_at: Instant,
}

impl Connection {
    pub fn new(session_id: String, sender: mpsc::Sender<Outbound>) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            user_id: RwLock::new(None),
            state: RwLock::new(ConnectionState::Connecting),
            sender,
            sequence: AtomicU64::new(0),
            snapshot_ticket: Mutex::new(0),
            overflowed: AtomicBool::new(false),
            overflow: Notify::new(),
            last_heartbeat: Mutex::new(Instant::now()),
            created_at: Instant::now(),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn user_id(&self) -> Option<Snowflake> {
        *self.user_id.read()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.read().is_some()
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    pub fn set_state(&self, state: ConnectionState) {
        *self.state.write() = state;
    }

    /// Bind the connection to a user. Returns false if it already was bound.
    pub(crate) fn authenticate(&self, user_id: Snowflake) -> bool {
        let mut current = self.user_id.write();
        if current.is_some() {
            return false;
        }
        *current = Some(user_id);
        *self.state.write() = ConnectionState::Connected;
        true
    }

    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    pub fn record_heartbeat(&self) {
        *self.last_heartbeat.lock() = Instant::now();
    }

    pub fn time_since_heartbeat(&self) -> Duration {
        self.last_heartbeat.lock().elapsed()
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Queue a `LINKS_SNAPSHOT` read under `ticket`.
    ///
    /// Tickets are taken before the read. A snapshot older than one already
    /// queued is dropped, so a connection never goes back in time. Returns
    /// whether the snapshot was queued.
    pub fn send_snapshot(&self, ticket: u64, data: &Value) -> Result<bool, SendError> {
        let mut newest = self.snapshot_ticket.lock();
        if *newest >= ticket {
            return Ok(false);
        }
        let message = GatewayMessage::dispatch(LINKS_SNAPSHOT, self.next_sequence(), data.clone());
        self.send(message)?;
        *newest = ticket;
        Ok(true)
    }

    pub fn send(&self, message: GatewayMessage) -> Result<(), SendError> {
        match self.sender.try_send(Outbound::Message(message)) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SendError::Closed),
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.mark_overflowed();
                Err(SendError::Full)
            }
        }
    }

    /// Ask the writer to close the socket with `code`.
    ///
    /// Returns false when the request could not be queued.
    pub fn close(&self, code: CloseCode) -> bool {
        match self.sender.try_send(Outbound::Close(code)) {
            Ok(()) => true,
            Err(e) => {
                tracing::trace!(session_id = %self.session_id, error = %e, "Close not queued");
                false
            }
        }
    }

    fn mark_overflowed(&self) {
        if !self.overflowed.swap(true, Ordering::SeqCst) {
            tracing::warn!(session_id = %self.session_id, "Outbound queue full, dropping connection");
            self.overflow.notify_one();
        }
    }

    pub fn is_overflowed(&self) -> bool {
        self.overflowed.load(Ordering::SeqCst)
    }

    /// Resolves once a send has found the queue full
    pub async fn overflowed(&self) {
        if self.is_overflowed() {
            return;
        }
        self.overflow.notified().await;
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("user_id", &self.user_id())
            .field("state", &self.state())
            .field("sequence", &self.current_sequence())
            .finish()
    }
}

//! Connection manager
//!
//! Tracks live sockets by session id and, once identified, by owner.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use onelink_core::Snowflake;
use tokio::sync::mpsc;

use super::{Connection, Outbound};

/// Result of binding a connection to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Bound; `first_for_user` is set when no other socket of the user was live
    Bound { first_for_user: bool },
    AlreadyAuthenticated,
    UnknownSession,
}

pub struct ConnectionManager {
    connections: DashMap<String, Arc<Connection>>,
    user_connections: DashMap<Snowflake, HashSet<String>>,
    snapshot_tickets: AtomicU64,
}

impl ConnectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            user_connections: DashMap::new(),
            snapshot_tickets: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    #[must_use]
    pub fn generate_session_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn add_connection(
        &self,
        session_id: String,
        sender: mpsc::Sender<Outbound>,
    ) -> Arc<Connection> {
        let connection = Connection::new(session_id.clone(), sender);
        self.connections.insert(session_id.clone(), Arc::clone(&connection));
        tracing::debug!(session_id = %session_id, "Connection added");
        connection
    }

    /// Drop a connection. Returns the owner when this was their last socket.
    pub fn remove_connection(&self, session_id: &str) -> Option<Snowflake> {
        let (_, connection) = self.connections.remove(session_id)?;
        tracing::debug!(session_id = %session_id, "Connection removed");

        let user_id = connection.user_id()?;
        match self.user_connections.entry(user_id) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().remove(session_id);
                if entry.get().is_empty() {
                    entry.remove();
                    return Some(user_id);
                }
                None
            }
            Entry::Vacant(_) => None,
        }
    }

    pub fn get_connection(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(session_id).map(|c| Arc::clone(&c))
    }

    pub fn authenticate_connection(&self, session_id: &str, user_id: Snowflake) -> Binding {
        let Some(connection) = self.get_connection(session_id) else {
            return Binding::UnknownSession;
        };
        if !connection.authenticate(user_id) {
            return Binding::AlreadyAuthenticated;
        }

        let mut sessions = self.user_connections.entry(user_id).or_default();
        let first_for_user = sessions.is_empty();
        sessions.insert(session_id.to_string());

        tracing::debug!(
            session_id = %session_id,
            user_id = %user_id,
            first_for_user,
            "Connection authenticated"
        );
        Binding::Bound { first_for_user }
    }

    pub fn get_user_connections(&self, user_id: Snowflake) -> Vec<Arc<Connection>> {
        self.user_connections
            .get(&user_id)
            .map(|sessions| {
                sessions
                    .iter()
                    .filter_map(|sid| self.get_connection(sid))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every user with at least one identified socket
    pub fn identified_users(&self) -> Vec<Snowflake> {
        self.user_connections.iter().map(|entry| *entry.key()).collect()
    }

    pub fn has_user(&self, user_id: Snowflake) -> bool {
        self.user_connections.contains_key(&user_id)
    }

    /// Ticket to take before reading a snapshot
    pub fn next_snapshot_ticket(&self) -> u64 {
        self.snapshot_tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of distinct identified users
    pub fn user_count(&self) -> usize {
        self.user_connections.len()
    }

    pub fn has_session(&self, session_id: &str) -> bool {
        self.connections.contains_key(session_id)
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .field("users", &self.user_connections.len())
            .finish()
    }
}

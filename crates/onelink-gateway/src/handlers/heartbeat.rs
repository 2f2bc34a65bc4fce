//! Heartbeat handler (op 1)

use std::sync::Arc;

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::GatewayMessage;

pub struct HeartbeatHandler;

impl HeartbeatHandler {
    /// Record the heartbeat and acknowledge it.
    ///
    /// `last_sequence` is the last dispatch the client saw, if any.
    pub async fn handle(connection: &Arc<Connection>, last_sequence: Option<u64>) -> HandlerResult<()> {
        connection.record_heartbeat();

        tracing::trace!(
            session_id = %connection.session_id(),
            client_seq = ?last_sequence,
            server_seq = connection.current_sequence(),
            "Heartbeat received"
        );

        connection
            .send(GatewayMessage::heartbeat_ack())
            .map_err(|_| HandlerError::ConnectionClosed)
    }
}

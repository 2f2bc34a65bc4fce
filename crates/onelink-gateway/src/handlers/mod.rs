//! Op code handlers

mod error;
mod heartbeat;
mod identify;

pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;
pub use identify::IdentifyHandler;

use std::sync::Arc;

use crate::connection::Connection;
use crate::protocol::{GatewayMessage, OpCode};
use crate::server::GatewayState;

/// Routes client frames to their handler
pub struct MessageDispatcher;

impl MessageDispatcher {
    pub async fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: GatewayMessage,
    ) -> HandlerResult<()> {
        match message.op {
            OpCode::Identify => {
                let payload = message.as_identify().ok_or_else(|| {
                    HandlerError::InvalidPayload("Identify requires a token".to_string())
                })?;
                IdentifyHandler::handle(state, connection, payload).await
            }
            OpCode::Heartbeat => {
                let seq = message.as_heartbeat_seq().unwrap_or_default();
                HeartbeatHandler::handle(connection, seq).await
            }
            op => {
                tracing::warn!(
                    session_id = %connection.session_id(),
                    op = %op,
                    "Received server-only op code from client"
                );
                Err(HandlerError::ServerOnlyOp(op))
            }
        }
    }
}

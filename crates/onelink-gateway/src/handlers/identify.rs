//! Identify handler (op 2)

use std::sync::Arc;

use super::{HandlerError, HandlerResult};
use crate::connection::{Binding, Connection};
use crate::protocol::IdentifyPayload;
use crate::server::GatewayState;

pub struct IdentifyHandler;

impl IdentifyHandler {
    /// Authenticate the socket, follow the owner's feed and send the first
    /// `LINKS_SNAPSHOT`.
    ///
    /// The feed is followed before the list is read, so a change landing
    /// during the read still produces a later snapshot.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: IdentifyPayload,
    ) -> HandlerResult<()> {
        if connection.is_authenticated() {
            return Err(HandlerError::AlreadyAuthenticated);
        }

        let claims = state
            .jwt_service()
            .validate_access_token(payload.bearer_token())
            .map_err(|e| HandlerError::AuthenticationFailed(e.to_string()))?;
        let user_id = claims
            .user_id()
            .map_err(|e| HandlerError::AuthenticationFailed(e.to_string()))?;

        let manager = state.connection_manager();
        match manager.authenticate_connection(connection.session_id(), user_id) {
            Binding::Bound { first_for_user } => {
                if first_for_user {
                    state.feeds().follow(user_id).await?;
                }
            }
            Binding::AlreadyAuthenticated => return Err(HandlerError::AlreadyAuthenticated),
            Binding::UnknownSession => return Err(HandlerError::ConnectionClosed),
        }

        let sent = state
            .snapshots()
            .deliver(manager, std::slice::from_ref(connection), user_id, None)
            .await?;
        if sent == 0 {
            return Err(HandlerError::ConnectionClosed);
        }

        tracing::info!(
            session_id = %connection.session_id(),
            user_id = %user_id,
            "Connection identified"
        );
        Ok(())
    }
}

//! WebSocket handler
//!
//! Each socket gets a writer task that owns the sink, plus a reader and a
//! heartbeat watchdog running on the upgrade task. Whichever ends first
//! decides the close code. A socket whose outbound queue fills up is dropped
//! without a close frame.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::connection::{Connection, ConnectionManager, ConnectionState, Outbound};
use crate::handlers::MessageDispatcher;
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload};
use crate::server::GatewayState;

/// Outbound queue depth per socket
const MESSAGE_BUFFER_SIZE: usize = 100;

/// How long the writer gets to flush a close frame
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// GET /ws/links
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let session_id = ConnectionManager::generate_session_id();
    let (tx, rx) = mpsc::channel::<Outbound>(MESSAGE_BUFFER_SIZE);
    let connection = state
        .connection_manager()
        .add_connection(session_id.clone(), tx);

    tracing::info!(session_id = %session_id, "WebSocket connection established");

    let (ws_sink, ws_stream) = socket.split();
    let mut writer = tokio::spawn(write_loop(session_id.clone(), ws_sink, rx));

    let interval_ms = u64::try_from(state.heartbeat_interval().as_millis()).unwrap_or(u64::MAX);
    let hello = GatewayMessage::hello(&HelloPayload::with_interval(interval_ms));
    if connection.send(hello).is_err() {
        tracing::warn!(session_id = %session_id, "Failed to queue Hello");
    }

    let close_code = tokio::select! {
        code = read_loop(&state, &connection, ws_stream) => code,
        code = heartbeat_watchdog(&state, &connection) => Some(code),
        _ = &mut writer => {
            tracing::debug!(session_id = %session_id, "Writer ended");
            None
        }
        () = connection.overflowed() => None,
    };

    close_writer(&connection, &mut writer, close_code).await;
    cleanup_connection(&state, &connection).await;
}

/// Stop the writer, flushing a close frame first when one can be queued
async fn close_writer(
    connection: &Connection,
    writer: &mut JoinHandle<()>,
    close_code: Option<CloseCode>,
) {
    if let Some(code) = close_code {
        tracing::debug!(
            session_id = %connection.session_id(),
            close_code = %code,
            "Closing connection"
        );
        if connection.close(code)
            && tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, &mut *writer)
                .await
                .is_ok()
        {
            return;
        }
    }
    writer.abort();
}

/// Read client frames until the socket ends or a frame warrants a close
async fn read_loop(
    state: &GatewayState,
    connection: &Arc<Connection>,
    mut stream: SplitStream<WebSocket>,
) -> Option<CloseCode> {
    let session_id = connection.session_id();
    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Err(code) = handle_text_message(state, connection, &text).await {
                    return code;
                }
            }
            Ok(Message::Binary(_)) => {
                tracing::debug!(session_id = %session_id, "Binary frames are not supported");
                return Some(CloseCode::DecodeError);
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                tracing::info!(session_id = %session_id, "Client closed connection");
                return None;
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "WebSocket error");
                return None;
            }
        }
    }
    None
}

/// Parse and route one text frame. `Err` carries the close code, if any.
async fn handle_text_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    text: &str,
) -> Result<(), Option<CloseCode>> {
    let message = GatewayMessage::from_json(text).map_err(|e| {
        tracing::debug!(session_id = %connection.session_id(), error = %e, "Rejected frame");
        Some(e.close_code())
    })?;

    tracing::trace!(session_id = %connection.session_id(), op = %message.op, "Received frame");

    MessageDispatcher::dispatch(state, connection, message)
        .await
        .map_err(|e| {
            tracing::warn!(session_id = %connection.session_id(), error = %e, "Handler error");
            e.to_close_code()
        })
}

/// Resolves with the close code once the socket misses its deadlines
async fn heartbeat_watchdog(state: &GatewayState, connection: &Connection) -> CloseCode {
    let interval = state.heartbeat_interval();
    let timeout = state.heartbeat_timeout();
    let mut check = tokio::time::interval((interval / 4).max(Duration::from_millis(50)));

    loop {
        check.tick().await;

        if !connection.is_authenticated() && connection.age() > interval {
            tracing::info!(session_id = %connection.session_id(), "No Identify in time");
            return CloseCode::NotAuthenticated;
        }

        let since = connection.time_since_heartbeat();
        if since > timeout {
            tracing::warn!(
                session_id = %connection.session_id(),
                since_ms = since.as_millis(),
                "Connection timed out (no heartbeat)"
            );
            return CloseCode::SessionTimeout;
        }
    }
}

/// Owns the sink: serializes queued frames until told to close
async fn write_loop(
    session_id: String,
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Outbound>,
) {
    while let Some(outbound) = rx.recv().await {
        match outbound {
            Outbound::Message(message) => {
                let json = match message.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!(session_id = %session_id, error = %e, "Failed to encode frame");
                        continue;
                    }
                };
                if sink.send(Message::Text(json)).await.is_err() {
                    tracing::debug!(session_id = %session_id, "Socket closed while sending");
                    return;
                }
            }
            Outbound::Close(code) => {
                let frame = CloseFrame {
                    code: code.as_u16(),
                    reason: Cow::Borrowed(code.description()),
                };
                if sink.send(Message::Close(Some(frame))).await.is_err() {
                    tracing::debug!(session_id = %session_id, "Socket gone before close frame");
                }
                break;
            }
        }
    }
    let _ = sink.close().await;
}

async fn cleanup_connection(state: &GatewayState, connection: &Connection) {
    connection.set_state(ConnectionState::Disconnected);
    let manager = state.connection_manager();

    if let Some(user_id) = manager.remove_connection(connection.session_id()) {
        if let Err(e) = state.feeds().unfollow(user_id).await {
            tracing::warn!(user_id = %user_id, error = %e, "Failed to unfollow feed");
        }
        // A new socket of the same user may have identified meanwhile
        if manager.has_user(user_id) {
            if let Err(e) = state.feeds().follow(user_id).await {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to refollow feed");
            }
        }
    }

    tracing::info!(
        session_id = %connection.session_id(),
        age_ms = connection.age().as_millis(),
        "Connection closed"
    );
}

//! Handler errors and the close code each one ends the socket with

use onelink_cache::SubscriberError;
use thiserror::Error;

use crate::broadcast::SnapshotError;
use crate::protocol::{CloseCode, OpCode};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Op {0} may not be sent by clients")]
    ServerOnlyOp(OpCode),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Already authenticated")]
    AlreadyAuthenticated,

    #[error("Feed subscription failed: {0}")]
    Subscription(#[from] SubscriberError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The writer is gone; there is no one left to send a close frame to
    #[error("Connection closed")]
    ConnectionClosed,
}

impl HandlerError {
    #[must_use]
    pub fn to_close_code(&self) -> Option<CloseCode> {
        match self {
            Self::InvalidPayload(_) => Some(CloseCode::DecodeError),
            Self::ServerOnlyOp(_) => Some(CloseCode::UnknownOpcode),
            Self::AuthenticationFailed(_) => Some(CloseCode::AuthenticationFailed),
            Self::AlreadyAuthenticated => Some(CloseCode::AlreadyAuthenticated),
            Self::Subscription(_) | Self::Snapshot(_) => Some(CloseCode::UnknownError),
            Self::ConnectionClosed => None,
        }
    }
}

pub type HandlerResult<T> = Result<T, HandlerError>;

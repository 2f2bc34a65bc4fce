//! Gateway frame format
//!
//! Every frame is `{op, t?, s?, d?}`. `t` and `s` only appear on dispatches.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CloseCode, HelloPayload, IdentifyPayload, OpCode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    pub op: OpCode,

    /// Event name (dispatch only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Per-connection sequence number (dispatch only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

/// Why an inbound frame was rejected
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unknown op code {0}")]
    UnknownOpcode(u64),
}

impl FrameError {
    #[must_use]
    pub fn close_code(&self) -> CloseCode {
        match self {
            Self::Decode(_) => CloseCode::DecodeError,
            Self::UnknownOpcode(_) => CloseCode::UnknownOpcode,
        }
    }
}

/// Inbound shape before the op is checked, so an unknown op is not a decode error
#[derive(Deserialize)]
struct RawFrame {
    op: u64,
    #[serde(default)]
    d: Option<Value>,
}

impl GatewayMessage {
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            t: Some(event_type.into()),
            s: Some(sequence),
            d: Some(data),
        }
    }

    #[must_use]
    pub fn hello(payload: &HelloPayload) -> Self {
        Self {
            op: OpCode::Hello,
            t: None,
            s: None,
            d: Some(serde_json::json!({ "heartbeat_interval": payload.heartbeat_interval })),
        }
    }

    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self {
            op: OpCode::HeartbeatAck,
            t: None,
            s: None,
            d: None,
        }
    }

    /// Parse a client frame
    pub fn from_json(json: &str) -> Result<Self, FrameError> {
        let raw: RawFrame = serde_json::from_str(json)?;
        let op = u8::try_from(raw.op)
            .ok()
            .and_then(OpCode::from_u8)
            .ok_or(FrameError::UnknownOpcode(raw.op))?;
        Ok(Self {
            op,
            t: None,
            s: None,
            d: raw.d,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Identify payload, if this is a well-formed op 2
    pub fn as_identify(&self) -> Option<IdentifyPayload> {
        if self.op != OpCode::Identify {
            return None;
        }
        self.d
            .as_ref()
            .and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    /// Last sequence the client saw, if this is op 1
    pub fn as_heartbeat_seq(&self) -> Option<Option<u64>> {
        if self.op != OpCode::Heartbeat {
            return None;
        }
        Some(self.d.as_ref().and_then(Value::as_u64))
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.t, self.s) {
            (Some(t), Some(s)) => write!(f, "GatewayMessage(op={}, t={t}, s={s})", self.op),
            _ => write!(f, "GatewayMessage(op={})", self.op),
        }
    }
}

//! Gateway message format
//!
//! All messages on the WebSocket connection share one frame shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{HelloPayload, IdentifyPayload, OpCode};

/// Gateway message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Event type (only for op=0 Dispatch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Sequence number (only for op=0 Dispatch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event data payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

impl GatewayMessage {
    // === Client Messages ===

    /// Create an Identify message (op=2)
    #[must_use]
    pub fn identify(payload: IdentifyPayload) -> Self {
        Self {
            op: OpCode::Identify,
            t: None,
            s: None,
            d: Some(serde_json::to_value(payload).unwrap_or_default()),
        }
    }

    /// Create a Heartbeat message (op=1) carrying the last seen sequence
    #[must_use]
    pub fn heartbeat(last_sequence: Option<u64>) -> Self {
        Self {
            op: OpCode::Heartbeat,
            t: None,
            s: None,
            d: last_sequence.map(|s| Value::Number(s.into())),
        }
    }

    // === Parsing Server Messages ===

    /// Parse a message from its JSON text frame
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serialize the message to a JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Check if this is a Dispatch message (op=0)
    #[must_use]
    pub fn is_dispatch(&self) -> bool {
        self.op == OpCode::Dispatch
    }

    /// Get the dispatch event type, if any
    #[must_use]
    pub fn event_type(&self) -> Option<&str> {
        if self.is_dispatch() {
            self.t.as_deref()
        } else {
            None
        }
    }

    /// Try to parse as a Hello payload (op=10)
    pub fn as_hello(&self) -> Option<HelloPayload> {
        if self.op != OpCode::Hello {
            return None;
        }
        self.d
            .as_ref()
            .and_then(|d| serde_json::from_value(d.clone()).ok())
    }
}

//! Gateway payload definitions
//!
//! Wire structures for the dispatch events the bot subscribes to, plus the
//! handshake payloads, and their conversions into domain types. The
//! platform delivers before/after message snapshots itself; this layer
//! only decodes and retypes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use vigil_core::{
    Attachment, AuditAction, AuditLogEntry, MemberChange, MessageSnapshot, Snowflake, User,
};

// === Handshake ===

/// Payload for op 10 (Hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

/// Payload for op 2 (Identify)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Authentication token
    pub token: String,

    /// Event group subscription mask
    pub intents: u64,

    /// Optional client properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IdentifyProperties>,
}

/// Client connection properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl IdentifyPayload {
    /// Guild moderation events (audit log entries)
    pub const INTENT_GUILD_MODERATION: u64 = 1 << 2;
    /// Guild message lifecycle events
    pub const INTENT_GUILD_MESSAGES: u64 = 1 << 9;
    /// Message content access
    pub const INTENT_MESSAGE_CONTENT: u64 = 1 << 15;

    /// Build the identify payload for a log bot session
    #[must_use]
    pub fn for_log_bot(token: &str) -> Self {
        Self {
            token: token.to_string(),
            intents: Self::INTENT_GUILD_MODERATION
                | Self::INTENT_GUILD_MESSAGES
                | Self::INTENT_MESSAGE_CONTENT,
            properties: Some(IdentifyProperties {
                os: Some(std::env::consts::OS.to_string()),
                device: Some(env!("CARGO_PKG_NAME").to_string()),
            }),
        }
    }
}

/// READY event payload
///
/// Sent after successful Identify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyPayload {
    /// Gateway protocol version
    pub v: i32,

    /// Current user
    pub user: UserPayload,

    /// Session ID
    pub session_id: String,
}

// === Dispatch Event Types ===

/// The dispatch event types the bot cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Ready,
    AuditLogEntryCreate,
    MessageUpdate,
    MessageDelete,
}

impl EventType {
    /// Parse an event type name from the `t` field
    ///
    /// Unknown names return `None`; those dispatches are skipped.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "READY" => Some(Self::Ready),
            "AUDIT_LOG_ENTRY_CREATE" => Some(Self::AuditLogEntryCreate),
            "MESSAGE_UPDATE" => Some(Self::MessageUpdate),
            "MESSAGE_DELETE" => Some(Self::MessageDelete),
            _ => None,
        }
    }

    /// Get the string representation of the event type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::AuditLogEntryCreate => "AUDIT_LOG_ENTRY_CREATE",
            Self::MessageUpdate => "MESSAGE_UPDATE",
            Self::MessageDelete => "MESSAGE_DELETE",
        }
    }
}

// === User Payload ===

/// User data included in events and REST responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: Snowflake,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl UserPayload {
    /// Convert into the domain user entity
    #[must_use]
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            avatar: self.avatar,
            bot: self.bot,
        }
    }
}

// === Message Events ===

/// Attachment metadata on a message payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentPayload {
    pub id: Snowflake,
    pub filename: String,
}

/// A message snapshot as carried on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    pub author: UserPayload,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentPayload>,
}

impl MessagePayload {
    /// Convert into a domain snapshot, attaching the resolved channel name
    #[must_use]
    pub fn into_snapshot(self, channel_name: String) -> MessageSnapshot {
        MessageSnapshot {
            id: self.id,
            channel_id: self.channel_id,
            channel_name,
            guild_id: self.guild_id,
            author: self.author.into_user(),
            content: self.content,
            attachments: self
                .attachments
                .into_iter()
                .map(|a| Attachment::new(a.id, a.filename))
                .collect(),
        }
    }
}

/// MESSAGE_UPDATE event payload: both snapshots come from the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageUpdatePayload {
    pub before: MessagePayload,
    pub after: MessagePayload,
}

// === Audit Log Events ===

/// One changed attribute on an audit entry, as carried on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditChangePayload {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

/// AUDIT_LOG_ENTRY_CREATE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntryPayload {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    /// The moderator who performed the action
    pub user_id: Snowflake,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<Snowflake>,
    pub action_type: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub changes: Vec<AuditChangePayload>,
}

impl AuditLogEntryPayload {
    /// Convert into the domain entry, retyping the generic key/value diff
    /// into the recognized change union
    #[must_use]
    pub fn into_entry(self) -> AuditLogEntry {
        let created_at = self.id.created_at();
        AuditLogEntry {
            id: self.id,
            guild_id: self.guild_id,
            actor_id: self.user_id,
            action: AuditAction::from_code(self.action_type),
            target_id: self.target_id,
            changes: self
                .changes
                .iter()
                .filter_map(decode_change)
                .collect(),
            reason: self.reason,
            created_at,
        }
    }
}

/// Retype one generic key/value change into the recognized union
fn decode_change(change: &AuditChangePayload) -> Option<MemberChange> {
    match change.key.as_str() {
        "nick" => Some(MemberChange::Nickname {
            before: as_string(&change.old_value),
            after: as_string(&change.new_value),
        }),
        "mute" => Some(MemberChange::Mute {
            before: as_bool(&change.old_value),
            after: as_bool(&change.new_value),
        }),
        "deaf" => Some(MemberChange::Deafen {
            before: as_bool(&change.old_value),
            after: as_bool(&change.new_value),
        }),
        "communication_disabled_until" => Some(MemberChange::Timeout {
            before: as_timestamp(&change.old_value),
            after: as_timestamp(&change.new_value),
        }),
        other => {
            trace!(key = other, "skipping unrecognized audit change key");
            None
        }
    }
}

fn as_bool(value: &Option<Value>) -> Option<bool> {
    value.as_ref().and_then(Value::as_bool)
}

fn as_string(value: &Option<Value>) -> Option<String> {
    value
        .as_ref()
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

fn as_timestamp(value: &Option<Value>) -> Option<DateTime<Utc>> {
    value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

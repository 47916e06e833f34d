//! Log events - the decoded domain events the bot reacts to
//!
//! Each variant corresponds to one subscribed gateway dispatch. Events are
//! handled independently and statelessly; there is no ordering contract
//! between variants.

use crate::entities::{AuditLogEntry, MessageSnapshot};

/// All events the log bot subscribes to
#[derive(Debug, Clone)]
pub enum LogEvent {
    /// A platform audit log entry was created (kick, ban, mute, ...)
    AuditLogEntryCreated(AuditLogEntry),
    /// A message was edited; both snapshots are supplied by the client
    MessageEdited {
        before: MessageSnapshot,
        after: MessageSnapshot,
    },
    /// A message was deleted; only the last known snapshot remains
    MessageDeleted(MessageSnapshot),
}

impl LogEvent {
    /// Get the event kind name, matching the gateway dispatch type
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuditLogEntryCreated(_) => "AUDIT_LOG_ENTRY_CREATE",
            Self::MessageEdited { .. } => "MESSAGE_UPDATE",
            Self::MessageDeleted(_) => "MESSAGE_DELETE",
        }
    }
}

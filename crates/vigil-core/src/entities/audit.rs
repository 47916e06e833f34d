//! Audit log entry entity - platform-generated records of admin actions

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Recognized audit log action codes
///
/// The platform assigns a numeric code to every administrative action.
/// Only the member-moderation subset is of interest here; everything else
/// decodes to `Unknown` and produces no notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditAction {
    MemberKick,
    MemberBanAdd,
    MemberBanRemove,
    MemberUpdate,
    Unknown(u16),
}

impl AuditAction {
    /// Create an `AuditAction` from the platform's numeric action code
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            20 => Self::MemberKick,
            22 => Self::MemberBanAdd,
            23 => Self::MemberBanRemove,
            24 => Self::MemberUpdate,
            other => Self::Unknown(other),
        }
    }

    /// Get the raw numeric code
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::MemberKick => 20,
            Self::MemberBanAdd => 22,
            Self::MemberBanRemove => 23,
            Self::MemberUpdate => 24,
            Self::Unknown(code) => code,
        }
    }

}

/// A single changed attribute on a member-update audit entry
///
/// Explicit tagged union over the recognized attribute diffs, each carrying
/// its own strongly-typed before/after payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberChange {
    Nickname {
        before: Option<String>,
        after: Option<String>,
    },
    Mute {
        before: Option<bool>,
        after: Option<bool>,
    },
    Deafen {
        before: Option<bool>,
        after: Option<bool>,
    },
    Timeout {
        before: Option<DateTime<Utc>>,
        after: Option<DateTime<Utc>>,
    },
}

impl MemberChange {
    /// Check whether this change produces a log notification
    ///
    /// Nickname changes are deliberately silent.
    #[must_use]
    pub const fn is_loggable(&self) -> bool {
        !matches!(self, Self::Nickname { .. })
    }
}

/// Audit log entry received from the event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    /// The moderator who performed the action
    pub actor_id: Snowflake,
    pub action: AuditAction,
    /// The user the action was applied to
    pub target_id: Option<Snowflake>,
    pub changes: Vec<MemberChange>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Check whether this entry will produce at least one notification
    #[must_use]
    pub fn is_loggable(&self) -> bool {
        match self.action {
            AuditAction::MemberKick | AuditAction::MemberBanAdd | AuditAction::MemberBanRemove => {
                true
            }
            AuditAction::MemberUpdate => self.changes.iter().any(MemberChange::is_loggable),
            AuditAction::Unknown(_) => false,
        }
    }
}

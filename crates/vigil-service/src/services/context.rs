//! Bot context - dependency container for the log services
//!
//! Holds the platform capabilities, channel routing, and display settings
//! every handler needs. An explicit context object is passed to each
//! service instead of any global client state, which keeps handlers
//! testable without a live connection.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};

use vigil_core::traits::{NotificationSink, UserDirectory};
use vigil_core::Snowflake;

/// Dependency container passed to all log services
#[derive(Clone)]
pub struct BotContext {
    // Capabilities
    users: Arc<dyn UserDirectory>,
    sink: Arc<dyn NotificationSink>,

    // Channel routing
    member_log_channel: Snowflake,
    message_log_channel: Snowflake,

    // Display
    display_offset: FixedOffset,

    // Identity, for the self-filter
    self_user_id: Snowflake,
}

impl BotContext {
    /// Create a new context with all dependencies
    pub fn new(
        users: Arc<dyn UserDirectory>,
        sink: Arc<dyn NotificationSink>,
        member_log_channel: Snowflake,
        message_log_channel: Snowflake,
        display_offset: FixedOffset,
        self_user_id: Snowflake,
    ) -> Self {
        Self {
            users,
            sink,
            member_log_channel,
            message_log_channel,
            display_offset,
            self_user_id,
        }
    }

    /// Get the user directory capability
    pub fn users(&self) -> &dyn UserDirectory {
        self.users.as_ref()
    }

    /// Get the notification sink capability
    pub fn sink(&self) -> &dyn NotificationSink {
        self.sink.as_ref()
    }

    /// Destination channel for member-moderation notifications
    pub fn member_log_channel(&self) -> Snowflake {
        self.member_log_channel
    }

    /// Destination channel for message edit/delete notifications
    pub fn message_log_channel(&self) -> Snowflake {
        self.message_log_channel
    }

    /// Offset applied when rendering timestamps
    pub fn display_offset(&self) -> FixedOffset {
        self.display_offset
    }

    /// The bot's own user ID
    pub fn self_user_id(&self) -> Snowflake {
        self.self_user_id
    }

    /// Current time in the configured display offset
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.display_offset)
    }
}

impl std::fmt::Debug for BotContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotContext")
            .field("member_log_channel", &self.member_log_channel)
            .field("message_log_channel", &self.message_log_channel)
            .field("display_offset", &self.display_offset)
            .field("self_user_id", &self.self_user_id)
            .finish()
    }
}

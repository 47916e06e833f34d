//! Message snapshot entity - the state of a message at event time

use crate::entities::User;
use crate::value_objects::Snowflake;

/// A message as captured by the event stream
///
/// For edit events two snapshots arrive (before and after); for delete
/// events only the last known state is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSnapshot {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    /// Name of the channel the message lives in, resolved at decode time
    pub channel_name: String,
    pub guild_id: Option<Snowflake>,
    pub author: User,
    pub content: String,
    pub attachments: Vec<Attachment>,
}

impl MessageSnapshot {
    /// Get the in-app jump link for this message
    ///
    /// Only guild messages have a stable jump path.
    pub fn jump_url(&self) -> Option<String> {
        self.guild_id
            .map(|guild_id| format!("/channels/{}/{}/{}", guild_id, self.channel_id, self.id))
    }

    /// Check whether a given user authored this message
    #[inline]
    pub fn is_authored_by(&self, user_id: Snowflake) -> bool {
        self.author.id == user_id
    }
}

/// Attachment metadata carried on a message snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub id: Snowflake,
    pub filename: String,
}

impl Attachment {
    pub fn new(id: Snowflake, filename: impl Into<String>) -> Self {
        Self {
            id,
            filename: filename.into(),
        }
    }
}

//! User entity - a platform user as seen by the log formatters

use crate::value_objects::Snowflake;

/// User entity resolved from the platform directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    /// Avatar image hash, if the user has one set
    pub avatar: Option<String>,
    pub bot: bool,
}

impl User {
    /// Create a new User with required fields
    pub fn new(id: Snowflake, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            avatar: None,
            bot: false,
        }
    }

    /// Render the user as a mention token
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    /// Get the avatar URL path, if an avatar is set
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar
            .as_ref()
            .map(|hash| format!("/avatars/{}/{}.png", self.id, hash))
    }

    /// Check if user is a bot account
    #[inline]
    pub fn is_bot(&self) -> bool {
        self.bot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention() {
        let user = User::new(Snowflake::new(42), "testuser");
        assert_eq!(user.mention(), "<@42>");
    }

    #[test]
    fn test_avatar_url_with_avatar() {
        let mut user = User::new(Snowflake::new(123), "testuser");
        user.avatar = Some("abc123".to_string());
        assert_eq!(user.avatar_url().as_deref(), Some("/avatars/123/abc123.png"));
    }

    #[test]
    fn test_avatar_url_default() {
        let user = User::new(Snowflake::new(123), "testuser");
        assert_eq!(user.avatar_url(), None);
    }
}

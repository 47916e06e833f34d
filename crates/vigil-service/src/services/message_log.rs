//! Message log service
//!
//! Turns message edit/delete events into notifications for the message log
//! channel. Events authored by the bot itself are suppressed so the bot
//! never logs its own notifications.

use chrono::{DateTime, FixedOffset};
use tracing::{debug, instrument};

use vigil_core::{AccentColor, Attachment, MessageSnapshot, Notification};

use super::context::BotContext;
use super::dispatcher::dispatch;
use super::error::ServiceResult;

/// Message log service
pub struct MessageLogService<'a> {
    ctx: &'a BotContext,
}

impl<'a> MessageLogService<'a> {
    /// Create a new `MessageLogService`
    pub fn new(ctx: &'a BotContext) -> Self {
        Self { ctx }
    }

    /// Handle a message edit
    #[instrument(skip(self, before, after), fields(message_id = %before.id))]
    pub async fn handle_edit(
        &self,
        before: &MessageSnapshot,
        after: &MessageSnapshot,
    ) -> ServiceResult<()> {
        if before.is_authored_by(self.ctx.self_user_id()) {
            debug!("skipping edit of own message");
            return Ok(());
        }

        let notification = render_edit(before, after, self.ctx.now());
        dispatch(self.ctx, self.ctx.message_log_channel(), &notification).await
    }

    /// Handle a message delete
    #[instrument(skip(self, message), fields(message_id = %message.id))]
    pub async fn handle_delete(&self, message: &MessageSnapshot) -> ServiceResult<()> {
        if message.is_authored_by(self.ctx.self_user_id()) {
            debug!("skipping delete of own message");
            return Ok(());
        }

        let notification = render_delete(message, self.ctx.now());
        dispatch(self.ctx, self.ctx.message_log_channel(), &notification).await
    }
}

/// Render a notification for an edited message
///
/// Pure function: no I/O, fully unit-testable.
pub fn render_edit(
    before: &MessageSnapshot,
    after: &MessageSnapshot,
    at: DateTime<FixedOffset>,
) -> Notification {
    let title = format!("Message edited in #{}", before.channel_name);
    let description = format!(
        "**Before: **{}\n**After: **{}",
        before.content, after.content
    );

    let mut notification = message_log(before, title, description, AccentColor::Blue, at);
    if let Some(url) = before.jump_url() {
        notification = notification.with_url(url);
    }
    notification
}

/// Render a notification for a deleted message
///
/// The "After" section stays empty: the content no longer exists.
pub fn render_delete(message: &MessageSnapshot, at: DateTime<FixedOffset>) -> Notification {
    let title = format!("Message deleted in #{}", message.channel_name);
    let description = format!("**Before: **{}\n**After: **", message.content);

    message_log(message, title, description, AccentColor::Red, at)
}

/// Build a message log notification with the shared layout
fn message_log(
    message: &MessageSnapshot,
    title: String,
    description: String,
    color: AccentColor,
    at: DateTime<FixedOffset>,
) -> Notification {
    let mut notification = Notification::new(title, description, color, at)
        .with_author(message.author.username.clone(), message.author.avatar_url())
        .with_footer(format!("ID: {}", message.author.id));

    if !message.attachments.is_empty() {
        notification = notification.field("Attachments", render_attachments(&message.attachments));
    }

    notification.field("Message ID", format!("`{}`", message.id))
}

/// Render the attachment list as one `id/filename` token per line
fn render_attachments(attachments: &[Attachment]) -> String {
    attachments
        .iter()
        .map(|a| format!("`{}/{}`", a.id, a.filename))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use vigil_core::{Snowflake, User};

    fn at() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2023, 7, 1, 12, 0, 0)
            .unwrap()
    }

    fn snapshot(content: &str) -> MessageSnapshot {
        MessageSnapshot {
            id: Snowflake::new(100),
            channel_id: Snowflake::new(20),
            channel_name: "general".to_string(),
            guild_id: Some(Snowflake::new(5)),
            author: User::new(Snowflake::new(7), "someone"),
            content: content.to_string(),
            attachments: vec![],
        }
    }

    #[test]
    fn test_edit_scenario() {
        let before = snapshot("hello");
        let mut after = before.clone();
        after.content = "hello world".to_string();

        let n = render_edit(&before, &after, at());
        assert_eq!(n.title, "Message edited in #general");
        assert!(n.description.contains("hello"));
        assert!(n.description.contains("hello world"));
        assert_eq!(n.description, "**Before: **hello\n**After: **hello world");
        assert_eq!(n.color, AccentColor::Blue);
        assert_eq!(n.url.as_deref(), Some("/channels/5/20/100"));
    }

    #[test]
    fn test_delete_scenario() {
        let message = snapshot("spam link");

        let n = render_delete(&message, at());
        assert_eq!(n.title, "Message deleted in #general");
        assert_eq!(n.description, "**Before: **spam link\n**After: **");
        assert_eq!(n.color, AccentColor::Red);
        assert_eq!(n.url, None);
    }

    #[test]
    fn test_attachment_lines_match_count() {
        let mut message = snapshot("with files");
        message.attachments = vec![
            Attachment::new(Snowflake::new(1), "a.png"),
            Attachment::new(Snowflake::new(2), "b.txt"),
            Attachment::new(Snowflake::new(3), "c.zip"),
        ];

        let n = render_delete(&message, at());
        let attachments = n
            .fields
            .iter()
            .find(|f| f.name == "Attachments")
            .expect("attachments field");
        let lines: Vec<&str> = attachments.value.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "`1/a.png`");
        assert_eq!(lines[1], "`2/b.txt`");
        assert_eq!(lines[2], "`3/c.zip`");
    }

    #[test]
    fn test_no_attachments_field_when_empty() {
        let n = render_edit(&snapshot("x"), &snapshot("y"), at());
        assert!(n.fields.iter().all(|f| f.name != "Attachments"));
    }

    #[test]
    fn test_message_id_field() {
        let n = render_delete(&snapshot("x"), at());
        let field = n
            .fields
            .iter()
            .find(|f| f.name == "Message ID")
            .expect("message id field");
        assert_eq!(field.value, "`100`");
    }

    #[test]
    fn test_footer_carries_author_id() {
        let n = render_delete(&snapshot("x"), at());
        assert_eq!(n.footer.as_deref(), Some("ID: 7"));
    }
}

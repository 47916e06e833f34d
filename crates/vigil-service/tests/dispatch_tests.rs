//! End-to-end routing tests against in-memory capability doubles
//!
//! Drives the router the way the gateway loop does, with a recording sink
//! and a static user directory standing in for the platform.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{FixedOffset, TimeZone, Utc};
use tokio::sync::Mutex;

use vigil_core::traits::{NotificationSink, PlatformError, PlatformResult, UserDirectory};
use vigil_core::{
    AccentColor, Attachment, AuditAction, AuditLogEntry, LogEvent, MemberChange, MessageSnapshot,
    Notification, Snowflake, User,
};
use vigil_service::{BotContext, EventRouter};

const SELF_ID: u64 = 999;
const MEMBER_LOG: u64 = 111;
const MESSAGE_LOG: u64 = 222;

/// Static user directory backed by a map
struct StaticDirectory {
    users: HashMap<Snowflake, User>,
}

impl StaticDirectory {
    fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn fetch_user(&self, id: Snowflake) -> PlatformResult<User> {
        self.users
            .get(&id)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(format!("/users/{id}")))
    }
}

/// Sink that records everything sent through it
#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<(Snowflake, Notification)>>,
}

impl RecordingSink {
    async fn sent(&self) -> Vec<(Snowflake, Notification)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, channel_id: Snowflake, notification: &Notification) -> PlatformResult<()> {
        self.sent.lock().await.push((channel_id, notification.clone()));
        Ok(())
    }
}

fn router_with(users: Vec<User>) -> (EventRouter, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let ctx = BotContext::new(
        Arc::new(StaticDirectory::with_users(users)),
        sink.clone(),
        Snowflake::new(MEMBER_LOG),
        Snowflake::new(MESSAGE_LOG),
        FixedOffset::east_opt(9 * 3600).unwrap(),
        Snowflake::new(SELF_ID),
    );
    (EventRouter::new(ctx), sink)
}

fn audit_entry(action: AuditAction, changes: Vec<MemberChange>) -> AuditLogEntry {
    AuditLogEntry {
        id: Snowflake::new(1),
        guild_id: Snowflake::new(2),
        actor_id: Snowflake::new(3),
        action,
        target_id: Some(Snowflake::new(4)),
        changes,
        reason: None,
        created_at: Utc::now(),
    }
}

fn message(author_id: u64, content: &str) -> MessageSnapshot {
    MessageSnapshot {
        id: Snowflake::new(100),
        channel_id: Snowflake::new(20),
        channel_name: "general".to_string(),
        guild_id: Some(Snowflake::new(2)),
        author: User::new(Snowflake::new(author_id), "author"),
        content: content.to_string(),
        attachments: vec![],
    }
}

#[tokio::test]
async fn ban_entry_reaches_member_log_channel() {
    let (router, sink) = router_with(vec![User::new(Snowflake::new(4), "target")]);

    router
        .handle(LogEvent::AuditLogEntryCreated(audit_entry(
            AuditAction::MemberBanAdd,
            vec![],
        )))
        .await;

    let sent = sink.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, Snowflake::new(MEMBER_LOG));
    assert_eq!(sent[0].1.title, "Member Banned");
    assert_eq!(sent[0].1.color, AccentColor::Red);
}

#[tokio::test]
async fn mute_toggle_produces_one_notification_per_change() {
    let (router, sink) = router_with(vec![User::new(Snowflake::new(4), "target")]);

    router
        .handle(LogEvent::AuditLogEntryCreated(audit_entry(
            AuditAction::MemberUpdate,
            vec![
                MemberChange::Mute {
                    before: Some(false),
                    after: Some(true),
                },
                MemberChange::Deafen {
                    before: Some(false),
                    after: Some(true),
                },
            ],
        )))
        .await;

    let sent = sink.sent().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].1.title, "Member Server Mute");
    assert_eq!(sent[1].1.title, "Member Server Speaker Mute");
}

#[tokio::test]
async fn nickname_only_update_sends_nothing() {
    let (router, sink) = router_with(vec![User::new(Snowflake::new(4), "target")]);

    router
        .handle(LogEvent::AuditLogEntryCreated(audit_entry(
            AuditAction::MemberUpdate,
            vec![MemberChange::Nickname {
                before: Some("old".to_string()),
                after: Some("new".to_string()),
            }],
        )))
        .await;

    assert!(sink.sent().await.is_empty());
}

#[tokio::test]
async fn unresolvable_target_drops_event_without_send() {
    // Directory is empty: the fetch fails, the router logs and moves on
    let (router, sink) = router_with(vec![]);

    router
        .handle(LogEvent::AuditLogEntryCreated(audit_entry(
            AuditAction::MemberKick,
            vec![],
        )))
        .await;

    assert!(sink.sent().await.is_empty());
}

#[tokio::test]
async fn edit_reaches_message_log_channel() {
    let (router, sink) = router_with(vec![]);

    let before = message(7, "hello");
    let mut after = before.clone();
    after.content = "hello world".to_string();

    router
        .handle(LogEvent::MessageEdited { before, after })
        .await;

    let sent = sink.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, Snowflake::new(MESSAGE_LOG));
    assert_eq!(sent[0].1.title, "Message edited in #general");
    assert!(sent[0].1.description.contains("hello world"));
}

#[tokio::test]
async fn delete_reaches_message_log_channel() {
    let (router, sink) = router_with(vec![]);

    router
        .handle(LogEvent::MessageDeleted(message(7, "spam link")))
        .await;

    let sent = sink.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1.title, "Message deleted in #general");
    assert_eq!(sent[0].1.color, AccentColor::Red);
    assert!(sent[0].1.description.ends_with("**After: **"));
}

#[tokio::test]
async fn own_messages_are_filtered() {
    let (router, sink) = router_with(vec![]);

    let before = message(SELF_ID, "self edit");
    let after = before.clone();
    router
        .handle(LogEvent::MessageEdited { before, after })
        .await;
    router
        .handle(LogEvent::MessageDeleted(message(SELF_ID, "self delete")))
        .await;

    assert!(sink.sent().await.is_empty());
}

#[tokio::test]
async fn attachments_render_one_line_each() {
    let (router, sink) = router_with(vec![]);

    let mut deleted = message(7, "files");
    deleted.attachments = vec![
        Attachment::new(Snowflake::new(11), "one.png"),
        Attachment::new(Snowflake::new(12), "two.pdf"),
    ];
    router.handle(LogEvent::MessageDeleted(deleted)).await;

    let sent = sink.sent().await;
    let field = sent[0]
        .1
        .fields
        .iter()
        .find(|f| f.name == "Attachments")
        .expect("attachments field");
    assert_eq!(field.value, "`11/one.png`\n`12/two.pdf`");
}

#[tokio::test]
async fn send_failure_is_contained() {
    // A sink that always fails must not panic the router
    struct FailingSink;

    #[async_trait]
    impl NotificationSink for FailingSink {
        async fn send(&self, _: Snowflake, _: &Notification) -> PlatformResult<()> {
            Err(PlatformError::Status { status: 502 })
        }
    }

    let ctx = BotContext::new(
        Arc::new(StaticDirectory::with_users(vec![User::new(
            Snowflake::new(4),
            "target",
        )])),
        Arc::new(FailingSink),
        Snowflake::new(MEMBER_LOG),
        Snowflake::new(MESSAGE_LOG),
        FixedOffset::east_opt(0).unwrap(),
        Snowflake::new(SELF_ID),
    );
    let router = EventRouter::new(ctx);

    router
        .handle(LogEvent::AuditLogEntryCreated(audit_entry(
            AuditAction::MemberKick,
            vec![],
        )))
        .await;
    router
        .handle(LogEvent::MessageDeleted(message(7, "still alive")))
        .await;
    // Reaching this point means both failures were confined to their events
}

#[tokio::test]
async fn timestamps_carry_display_offset() {
    let (router, sink) = router_with(vec![]);

    router
        .handle(LogEvent::MessageDeleted(message(7, "x")))
        .await;

    let sent = sink.sent().await;
    let offset = FixedOffset::east_opt(9 * 3600).unwrap();
    assert_eq!(sent[0].1.timestamp.offset(), &offset);
    // Sanity: the instant itself is recent
    let now = Utc::now().with_timezone(&offset);
    assert!((now - sent[0].1.timestamp).num_seconds() < 60);
}

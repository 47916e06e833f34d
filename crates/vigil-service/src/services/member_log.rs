//! Member log service
//!
//! Turns member-moderation audit entries into notifications for the member
//! log channel. Title and color encode the transition: applying a state is
//! Orange, lifting it is Yellow, kicks and bans are Red, unbans are Blue.

use chrono::{DateTime, FixedOffset};
use tracing::{instrument, warn};

use vigil_core::{
    AccentColor, AuditAction, AuditLogEntry, MemberChange, Notification, User,
};

use super::context::BotContext;
use super::dispatcher::dispatch;
use super::error::{ServiceError, ServiceResult};

/// Member log service
pub struct MemberLogService<'a> {
    ctx: &'a BotContext,
}

impl<'a> MemberLogService<'a> {
    /// Create a new `MemberLogService`
    pub fn new(ctx: &'a BotContext) -> Self {
        Self { ctx }
    }

    /// Handle one audit log entry
    ///
    /// Resolves the target user, renders zero or more notifications, and
    /// delivers them to the member log channel. Entries that produce no
    /// notification (nickname-only updates, unrecognized actions) are
    /// silently skipped.
    #[instrument(skip(self, entry), fields(entry_id = %entry.id, action = ?entry.action))]
    pub async fn handle_entry(&self, entry: &AuditLogEntry) -> ServiceResult<()> {
        if !entry.is_loggable() {
            return Ok(());
        }

        let Some(target_id) = entry.target_id else {
            warn!("audit entry carries no target user, dropping");
            return Ok(());
        };

        let target = self
            .ctx
            .users()
            .fetch_user(target_id)
            .await
            .map_err(|source| ServiceError::UserResolution {
                user_id: target_id,
                source,
            })?;

        let notifications = render_entry(entry, &target, self.ctx.now(), self.ctx.display_offset());
        for notification in &notifications {
            dispatch(self.ctx, self.ctx.member_log_channel(), notification).await?;
        }

        Ok(())
    }
}

/// Render all notifications for one audit entry
///
/// Pure function: no I/O, fully unit-testable.
pub fn render_entry(
    entry: &AuditLogEntry,
    target: &User,
    at: DateTime<FixedOffset>,
    display_offset: FixedOffset,
) -> Vec<Notification> {
    match entry.action {
        AuditAction::MemberUpdate => entry
            .changes
            .iter()
            .filter_map(|change| render_change(entry, target, change, at, display_offset))
            .collect(),
        AuditAction::MemberKick => {
            vec![member_log(entry, target, "Member Kicked", None, AccentColor::Red, at)]
        }
        AuditAction::MemberBanAdd => {
            vec![member_log(entry, target, "Member Banned", None, AccentColor::Red, at)]
        }
        AuditAction::MemberBanRemove => {
            vec![member_log(entry, target, "Member Unbanned", None, AccentColor::Blue, at)]
        }
        AuditAction::Unknown(_) => Vec::new(),
    }
}

/// Render one changed attribute of a member-update entry
fn render_change(
    entry: &AuditLogEntry,
    target: &User,
    change: &MemberChange,
    at: DateTime<FixedOffset>,
    display_offset: FixedOffset,
) -> Option<Notification> {
    match change {
        // Nickname changes are deliberately not logged
        MemberChange::Nickname { .. } => None,
        MemberChange::Mute { after, .. } => Some(if after.unwrap_or(false) {
            member_log(entry, target, "Member Server Mute", None, AccentColor::Orange, at)
        } else {
            member_log(
                entry,
                target,
                "Member Removed From Server Mute",
                None,
                AccentColor::Yellow,
                at,
            )
        }),
        MemberChange::Deafen { after, .. } => Some(if after.unwrap_or(false) {
            member_log(
                entry,
                target,
                "Member Server Speaker Mute",
                None,
                AccentColor::Orange,
                at,
            )
        } else {
            member_log(
                entry,
                target,
                "Member Removed From Server Speaker Mute",
                None,
                AccentColor::Yellow,
                at,
            )
        }),
        MemberChange::Timeout { after, .. } => Some(match after {
            Some(until) => {
                let value = format!(
                    "`{}`",
                    until
                        .with_timezone(&display_offset)
                        .format("%Y-%m-%d %H:%M:%S%:z")
                );
                member_log(
                    entry,
                    target,
                    "Member Timeout",
                    Some(("Duration", value)),
                    AccentColor::Orange,
                    at,
                )
            }
            None => member_log(
                entry,
                target,
                "Member Removed From Timeout",
                None,
                AccentColor::Yellow,
                at,
            ),
        }),
    }
}

/// Build a member log notification with the shared layout
fn member_log(
    entry: &AuditLogEntry,
    target: &User,
    title: &str,
    field: Option<(&str, String)>,
    color: AccentColor,
    at: DateTime<FixedOffset>,
) -> Notification {
    let mut notification = Notification::new(title, target.mention(), color, at)
        .with_author(target.username.clone(), target.avatar_url())
        .with_footer(format!("ID: {}", target.id));

    if let Some((name, value)) = field {
        notification = notification.field(name, value);
    }
    if let Some(reason) = &entry.reason {
        notification = notification.field("Reason", reason.clone());
    }

    notification
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vigil_core::Snowflake;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn at() -> DateTime<FixedOffset> {
        offset().with_ymd_and_hms(2023, 7, 1, 12, 0, 0).unwrap()
    }

    fn target() -> User {
        User::new(Snowflake::new(4), "target")
    }

    fn entry(action: AuditAction, changes: Vec<MemberChange>) -> AuditLogEntry {
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

    #[test]
    fn test_nickname_only_update_produces_nothing() {
        let e = entry(
            AuditAction::MemberUpdate,
            vec![MemberChange::Nickname {
                before: Some("old".to_string()),
                after: Some("new".to_string()),
            }],
        );
        assert!(render_entry(&e, &target(), at(), offset()).is_empty());
    }

    #[test]
    fn test_mute_enabled() {
        let e = entry(
            AuditAction::MemberUpdate,
            vec![MemberChange::Mute {
                before: Some(false),
                after: Some(true),
            }],
        );
        let rendered = render_entry(&e, &target(), at(), offset());
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].title, "Member Server Mute");
        assert_eq!(rendered[0].color, AccentColor::Orange);
        assert_eq!(rendered[0].description, "<@4>");
    }

    #[test]
    fn test_mute_disabled() {
        let e = entry(
            AuditAction::MemberUpdate,
            vec![MemberChange::Mute {
                before: Some(true),
                after: Some(false),
            }],
        );
        let rendered = render_entry(&e, &target(), at(), offset());
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].title, "Member Removed From Server Mute");
        assert_eq!(rendered[0].color, AccentColor::Yellow);
    }

    #[test]
    fn test_deafen_transitions() {
        let on = entry(
            AuditAction::MemberUpdate,
            vec![MemberChange::Deafen {
                before: Some(false),
                after: Some(true),
            }],
        );
        let rendered = render_entry(&on, &target(), at(), offset());
        assert_eq!(rendered[0].title, "Member Server Speaker Mute");
        assert_eq!(rendered[0].color, AccentColor::Orange);

        let off = entry(
            AuditAction::MemberUpdate,
            vec![MemberChange::Deafen {
                before: Some(true),
                after: None,
            }],
        );
        let rendered = render_entry(&off, &target(), at(), offset());
        assert_eq!(rendered[0].title, "Member Removed From Server Speaker Mute");
        assert_eq!(rendered[0].color, AccentColor::Yellow);
    }

    #[test]
    fn test_timeout_set_renders_duration_in_display_offset() {
        let until = Utc.with_ymd_and_hms(2023, 7, 1, 3, 30, 0).unwrap();
        let e = entry(
            AuditAction::MemberUpdate,
            vec![MemberChange::Timeout {
                before: None,
                after: Some(until),
            }],
        );
        let rendered = render_entry(&e, &target(), at(), offset());
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].title, "Member Timeout");
        assert_eq!(rendered[0].color, AccentColor::Orange);
        assert_eq!(rendered[0].fields.len(), 1);
        assert_eq!(rendered[0].fields[0].name, "Duration");
        // 03:30 UTC rendered at +09:00
        assert_eq!(rendered[0].fields[0].value, "`2023-07-01 12:30:00+09:00`");
    }

    #[test]
    fn test_timeout_cleared() {
        let e = entry(
            AuditAction::MemberUpdate,
            vec![MemberChange::Timeout {
                before: Some(Utc.with_ymd_and_hms(2023, 7, 1, 3, 30, 0).unwrap()),
                after: None,
            }],
        );
        let rendered = render_entry(&e, &target(), at(), offset());
        assert_eq!(rendered[0].title, "Member Removed From Timeout");
        assert_eq!(rendered[0].color, AccentColor::Yellow);
        assert!(rendered[0].fields.is_empty());
    }

    #[test]
    fn test_kick_ban_unban_colors() {
        let cases = [
            (AuditAction::MemberKick, "Member Kicked", AccentColor::Red),
            (AuditAction::MemberBanAdd, "Member Banned", AccentColor::Red),
            (AuditAction::MemberBanRemove, "Member Unbanned", AccentColor::Blue),
        ];
        for (action, title, color) in cases {
            let rendered = render_entry(&entry(action, vec![]), &target(), at(), offset());
            assert_eq!(rendered.len(), 1, "{title} should produce exactly one");
            assert_eq!(rendered[0].title, title);
            assert_eq!(rendered[0].color, color);
        }
    }

    #[test]
    fn test_unknown_action_produces_nothing() {
        let rendered = render_entry(
            &entry(AuditAction::Unknown(72), vec![]),
            &target(),
            at(),
            offset(),
        );
        assert!(rendered.is_empty());
    }

    #[test]
    fn test_reason_field_appended() {
        let mut e = entry(AuditAction::MemberBanAdd, vec![]);
        e.reason = Some("repeated spam".to_string());
        let rendered = render_entry(&e, &target(), at(), offset());
        assert_eq!(rendered[0].fields.len(), 1);
        assert_eq!(rendered[0].fields[0].name, "Reason");
        assert_eq!(rendered[0].fields[0].value, "repeated spam");
    }

    #[test]
    fn test_footer_carries_target_id() {
        let rendered = render_entry(
            &entry(AuditAction::MemberKick, vec![]),
            &target(),
            at(),
            offset(),
        );
        assert_eq!(rendered[0].footer.as_deref(), Some("ID: 4"));
    }

    #[test]
    fn test_multiple_changes_render_in_order() {
        let e = entry(
            AuditAction::MemberUpdate,
            vec![
                MemberChange::Nickname {
                    before: None,
                    after: Some("nick".to_string()),
                },
                MemberChange::Mute {
                    before: Some(false),
                    after: Some(true),
                },
                MemberChange::Deafen {
                    before: Some(true),
                    after: Some(false),
                },
            ],
        );
        let rendered = render_entry(&e, &target(), at(), offset());
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].title, "Member Server Mute");
        assert_eq!(rendered[1].title, "Member Removed From Server Speaker Mute");
    }
}

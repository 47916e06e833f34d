//! Notification dispatch
//!
//! Validates a rendered notification and delivers it through the sink.
//! Delivery failures are surfaced, never swallowed: these are audit
//! records, and the source does not replay them.

use tracing::debug;

use vigil_core::traits::PlatformError;
use vigil_core::{Notification, Snowflake};

use super::context::BotContext;
use super::error::{ServiceError, ServiceResult};

/// Send a notification to the given log channel
pub(crate) async fn dispatch(
    ctx: &BotContext,
    channel_id: Snowflake,
    notification: &Notification,
) -> ServiceResult<()> {
    notification
        .validate()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    ctx.sink()
        .send(channel_id, notification)
        .await
        .map_err(|e| match e {
            PlatformError::NotFound(_) | PlatformError::Forbidden(_) => {
                ServiceError::ChannelNotFound(channel_id)
            }
            other => ServiceError::SendFailed(other),
        })?;

    debug!(channel_id = %channel_id, title = %notification.title, "notification delivered");
    Ok(())
}

//! Event router
//!
//! Routes each decoded log event to the matching service. One handler per
//! event kind; failures are confined to the event being processed and
//! never escape as panics or crash the process.

use tracing::{error, warn};

use vigil_core::LogEvent;

use crate::services::{BotContext, MemberLogService, MessageLogService, ServiceError};

/// Routes log events to their handlers
pub struct EventRouter {
    ctx: BotContext,
}

impl EventRouter {
    /// Create a new router over the given context
    pub fn new(ctx: BotContext) -> Self {
        Self { ctx }
    }

    /// Get the underlying context
    pub fn context(&self) -> &BotContext {
        &self.ctx
    }

    /// Handle one event to completion
    ///
    /// Errors are logged and swallowed here: an audit record that cannot
    /// be delivered must not take the rest of the stream down with it.
    pub async fn handle(&self, event: LogEvent) {
        let kind = event.kind();
        let outcome = match &event {
            LogEvent::AuditLogEntryCreated(entry) => {
                MemberLogService::new(&self.ctx).handle_entry(entry).await
            }
            LogEvent::MessageEdited { before, after } => {
                MessageLogService::new(&self.ctx)
                    .handle_edit(before, after)
                    .await
            }
            LogEvent::MessageDeleted(message) => {
                MessageLogService::new(&self.ctx).handle_delete(message).await
            }
        };

        if let Err(err) = outcome {
            if matches!(err, ServiceError::UserResolution { .. }) {
                warn!(event = kind, error = %err, "event dropped");
            } else {
                error!(event = kind, error = %err, "failed to log event");
            }
        }
    }
}

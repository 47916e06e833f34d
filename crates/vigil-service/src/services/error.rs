//! Service layer error types

use thiserror::Error;

use vigil_core::traits::PlatformError;
use vigil_core::Snowflake;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service layer error type
///
/// Every variant is scoped to the single event being processed; the router
/// logs it and moves on. Nothing here crashes the process.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Target/author lookup failed - the event is dropped
    #[error("failed to resolve user {user_id}")]
    UserResolution {
        user_id: Snowflake,
        #[source]
        source: PlatformError,
    },

    /// Configured log channel is invalid or inaccessible
    #[error("log channel {0} not found or inaccessible")]
    ChannelNotFound(Snowflake),

    /// Transient network/API error while delivering a notification
    #[error("failed to deliver notification")]
    SendFailed(#[source] PlatformError),

    /// Notification failed its invariants before delivery
    #[error("notification rejected: {0}")]
    Validation(String),
}

impl ServiceError {
    /// Check whether this error means the event was dropped pre-delivery
    #[must_use]
    pub fn is_drop(&self) -> bool {
        matches!(self, Self::UserResolution { .. } | Self::Validation(_))
    }
}

//! Platform capability traits (ports)
//!
//! The domain defines what it needs from the platform; the adapter layer
//! provides the implementation. Handlers only ever talk to these traits,
//! which keeps them unit-testable without a live connection.

use async_trait::async_trait;

use crate::entities::{Notification, User};
use crate::value_objects::Snowflake;

/// Result type for platform capability calls
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Errors surfaced by platform capability implementations
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("access forbidden: {0}")]
    Forbidden(String),

    #[error("authentication rejected")]
    Unauthorized,

    #[error("api returned status {status}")]
    Status { status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed payload: {0}")]
    Decode(String),
}

/// User lookup capability
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a user by ID from the platform directory
    async fn fetch_user(&self, id: Snowflake) -> PlatformResult<User>;
}

/// Outbound notification delivery capability
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Send a rendered notification to the channel with the given ID
    async fn send(&self, channel_id: Snowflake, notification: &Notification) -> PlatformResult<()>;
}

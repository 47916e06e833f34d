//! # vigil-common
//!
//! Shared utilities including configuration, secret loading, and telemetry.

pub mod config;
pub mod secret;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, ConfigError, DisplayConfig, Environment, LogChannelConfig,
    PlatformConfig, TokenConfig,
};
pub use secret::{BotToken, TokenError};
pub use telemetry::{
    init_tracing, try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError,
};

//! Application configuration structs
//!
//! Loads configuration from environment variables.

use chrono::FixedOffset;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use vigil_core::Snowflake;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub platform: PlatformConfig,
    pub channels: LogChannelConfig,
    pub display: DisplayConfig,
    pub token: TokenConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Platform endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// WebSocket gateway URL (wss://...)
    pub gateway_url: String,
    /// REST API base URL, without trailing slash
    pub api_base_url: String,
}

/// Log channel routing configuration
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LogChannelConfig {
    /// Destination for member-moderation notifications
    pub member_log_id: Snowflake,
    /// Destination for message edit/delete notifications
    pub message_log_id: Snowflake,
}

/// Timestamp display configuration
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DisplayConfig {
    /// Hours east of UTC used when rendering timestamps (display only)
    #[serde(default = "default_timezone_offset_hours")]
    pub timezone_offset_hours: i32,
}

impl DisplayConfig {
    /// Get the display offset as a chrono `FixedOffset`
    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.timezone_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }
}

/// Bot token source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_token_file")]
    pub file: PathBuf,
}

// Default value functions
fn default_app_name() -> String {
    "vigil".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_timezone_offset_hours() -> i32 {
    9
}

fn default_token_file() -> PathBuf {
    PathBuf::from(".token")
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            platform: PlatformConfig {
                gateway_url: env::var("GATEWAY_URL")
                    .map_err(|_| ConfigError::MissingVar("GATEWAY_URL"))?,
                api_base_url: env::var("API_BASE_URL")
                    .map(|s| s.trim_end_matches('/').to_string())
                    .map_err(|_| ConfigError::MissingVar("API_BASE_URL"))?,
            },
            channels: LogChannelConfig {
                member_log_id: required_snowflake("MEMBER_LOG_CHANNEL_ID")?,
                message_log_id: required_snowflake("MESSAGE_LOG_CHANNEL_ID")?,
            },
            display: DisplayConfig {
                timezone_offset_hours: match env::var("TIMEZONE_OFFSET_HOURS") {
                    Ok(raw) => raw
                        .parse::<i32>()
                        .ok()
                        .filter(|h| (-23..=23).contains(h))
                        .ok_or(ConfigError::InvalidValue("TIMEZONE_OFFSET_HOURS", raw))?,
                    Err(_) => default_timezone_offset_hours(),
                },
            },
            token: TokenConfig {
                file: env::var("TOKEN_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| default_token_file()),
            },
        })
    }
}

fn required_snowflake(var: &'static str) -> Result<Snowflake, ConfigError> {
    let raw = env::var(var).map_err(|_| ConfigError::MissingVar(var))?;
    raw.parse::<Snowflake>()
        .map_err(|_| ConfigError::InvalidValue(var, raw))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

//! REST API client
//!
//! Implements the platform capability traits over HTTP. The bot token is
//! attached as an Authorization header and never logged.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use vigil_common::BotToken;
use vigil_core::traits::{NotificationSink, PlatformError, PlatformResult, UserDirectory};
use vigil_core::{Notification, Snowflake, User};

use super::embed::CreateMessage;
use crate::protocol::UserPayload;

/// REST client for the platform API
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth_header: String,
}

/// Channel data returned by the channel endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelModel {
    pub id: Snowflake,
    pub name: String,
}

impl ApiClient {
    /// Create a new client against the given API base URL
    pub fn new(base_url: impl Into<String>, token: &BotToken) -> PlatformResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("vigil/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            auth_header: format!("Bot {}", token.expose()),
        })
    }

    /// Fetch the bot's own user
    pub async fn current_user(&self) -> PlatformResult<User> {
        self.get_json::<UserPayload>("/users/@me")
            .await
            .map(UserPayload::into_user)
    }

    /// Fetch a channel by ID
    pub async fn fetch_channel(&self, id: Snowflake) -> PlatformResult<ChannelModel> {
        self.get_json(&format!("/channels/{id}")).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> PlatformResult<T> {
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .header(AUTHORIZATION, self.auth_header.as_str())
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        check_status(response, path)?
            .json()
            .await
            .map_err(|e| PlatformError::Decode(e.to_string()))
    }
}

/// Map HTTP status codes onto platform errors
fn check_status(response: Response, path: &str) -> PlatformResult<Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED => Err(PlatformError::Unauthorized),
        StatusCode::FORBIDDEN => Err(PlatformError::Forbidden(path.to_string())),
        StatusCode::NOT_FOUND => Err(PlatformError::NotFound(path.to_string())),
        status => Err(PlatformError::Status {
            status: status.as_u16(),
        }),
    }
}

#[async_trait]
impl UserDirectory for ApiClient {
    async fn fetch_user(&self, id: Snowflake) -> PlatformResult<User> {
        self.get_json::<UserPayload>(&format!("/users/{id}"))
            .await
            .map(UserPayload::into_user)
    }
}

#[async_trait]
impl NotificationSink for ApiClient {
    async fn send(&self, channel_id: Snowflake, notification: &Notification) -> PlatformResult<()> {
        let path = format!("/channels/{channel_id}/messages");
        let body = CreateMessage::from_notification(notification);

        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .header(AUTHORIZATION, self.auth_header.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        check_status(response, &path).map(|_| ())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

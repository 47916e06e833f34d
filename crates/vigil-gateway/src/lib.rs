//! # vigil-gateway
//!
//! Platform adapter: the gateway WebSocket subscriber, the REST capability
//! client, and the wiring that runs the bot. Everything above this crate
//! talks to the platform only through the capability traits in
//! `vigil-core`.

pub mod client;
pub mod protocol;
pub mod rest;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use vigil_common::{AppConfig, BotToken};
use vigil_core::traits::{NotificationSink, UserDirectory};
use vigil_service::{BotContext, EventRouter};

use client::{GatewaySubscriber, SubscriberConfig};
use rest::ApiClient;

/// Run the log bot until the gateway connection ends
///
/// Startup failures (unreadable token, rejected identify) are fatal. A
/// dropped connection also ends the run: resume and reconnect are
/// deliberately left to the operator's process supervisor.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let token =
        BotToken::from_file(&config.token.file).context("failed to read bot token")?;

    let api = Arc::new(
        ApiClient::new(config.platform.api_base_url.clone(), &token)
            .context("failed to build API client")?,
    );

    let subscriber = GatewaySubscriber::new(
        SubscriberConfig::new(config.platform.gateway_url.clone()),
        token,
        Arc::clone(&api),
    );
    let mut session = subscriber.connect().await.context("gateway handshake failed")?;

    let self_user = session.user().clone();
    info!(user_id = %self_user.id, username = %self_user.username, "logged in");

    let users: Arc<dyn UserDirectory> = api.clone();
    let sink: Arc<dyn NotificationSink> = api;
    let ctx = BotContext::new(
        users,
        sink,
        config.channels.member_log_id,
        config.channels.message_log_id,
        config.display.offset(),
        self_user.id,
    );
    let router = EventRouter::new(ctx);

    while let Some(event) = session.next_event().await {
        router.handle(event).await;
    }

    Err(anyhow::anyhow!("gateway connection closed"))
}

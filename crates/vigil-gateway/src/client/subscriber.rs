//! Gateway subscriber
//!
//! Connects to the platform gateway, performs the Hello/Identify
//! handshake, and decodes the subscribed dispatch events into domain
//! events delivered over an mpsc channel.
//!
//! There is no resume and no reconnect here: the platform client contract
//! leaves connection recovery to the process supervisor, so a closed or
//! failed connection simply ends the event stream.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{error, info, warn};

use vigil_common::BotToken;
use vigil_core::{LogEvent, User};

use crate::protocol::{
    AuditLogEntryPayload, EventType, GatewayMessage, IdentifyPayload, MessagePayload,
    MessageUpdatePayload, OpCode, ReadyPayload,
};
use crate::rest::ApiClient;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;
type WsSource = SplitStream<WsStream>;

/// Configuration for the gateway subscriber
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Gateway WebSocket URL
    pub gateway_url: String,
    /// Event channel buffer size
    pub event_buffer: usize,
}

impl SubscriberConfig {
    /// Create a config with the default buffer size
    #[must_use]
    pub fn new(gateway_url: impl Into<String>) -> Self {
        Self {
            gateway_url: gateway_url.into(),
            event_buffer: 256,
        }
    }
}

/// Gateway client errors
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("websocket transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("session rejected by gateway")]
    SessionRejected,

    #[error("connection closed: {0}")]
    Closed(String),

    #[error("malformed gateway message: {0}")]
    Decode(String),
}

/// An established gateway session
pub struct Session {
    user: User,
    events: mpsc::Receiver<LogEvent>,
}

impl Session {
    /// The bot's own user, as reported by READY
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Receive the next decoded event
    ///
    /// Returns `None` once the underlying connection has ended.
    pub async fn next_event(&mut self) -> Option<LogEvent> {
        self.events.recv().await
    }
}

/// Connects to the gateway and produces a [`Session`]
pub struct GatewaySubscriber {
    config: SubscriberConfig,
    token: BotToken,
    api: Arc<ApiClient>,
}

impl GatewaySubscriber {
    /// Create a new subscriber
    pub fn new(config: SubscriberConfig, token: BotToken, api: Arc<ApiClient>) -> Self {
        Self { config, token, api }
    }

    /// Connect, identify, and start the event pump
    ///
    /// Fails fast on any handshake problem; a rejected identify is a
    /// startup error, not something to retry.
    pub async fn connect(self) -> Result<Session, GatewayError> {
        info!(url = %self.config.gateway_url, "connecting to gateway");
        let (stream, _) = connect_async(self.config.gateway_url.as_str()).await?;
        let (mut sink, mut source) = stream.split();

        // Hello
        let hello = loop {
            let msg = next_message(&mut source).await?;
            if let Some(hello) = msg.as_hello() {
                break hello;
            }
        };

        // Identify
        let identify = GatewayMessage::identify(IdentifyPayload::for_log_bot(self.token.expose()));
        send_message(&mut sink, &identify).await?;

        // Ready
        let (ready, last_seq) = await_ready(&mut source).await?;
        let user = ready.user.into_user();
        info!(
            user_id = %user.id,
            heartbeat_ms = hello.heartbeat_interval,
            "gateway session established"
        );

        let (tx, rx) = mpsc::channel(self.config.event_buffer);
        tokio::spawn(pump(
            sink,
            source,
            hello.heartbeat_interval,
            last_seq,
            self.api,
            tx,
        ));

        Ok(Session { user, events: rx })
    }
}

/// Read frames until the next parseable gateway message
async fn next_message(source: &mut WsSource) -> Result<GatewayMessage, GatewayError> {
    while let Some(frame) = source.next().await {
        match frame? {
            WsMessage::Text(text) => {
                return GatewayMessage::from_json(&text)
                    .map_err(|e| GatewayError::Decode(e.to_string()));
            }
            WsMessage::Close(frame) => {
                let reason = frame.map(|f| f.reason.to_string()).unwrap_or_default();
                return Err(GatewayError::Closed(reason));
            }
            // Ping/pong is handled by the transport
            _ => {}
        }
    }
    Err(GatewayError::Closed("stream ended".to_string()))
}

/// Wait for the READY dispatch that follows a successful Identify
async fn await_ready(source: &mut WsSource) -> Result<(ReadyPayload, Option<u64>), GatewayError> {
    loop {
        let msg = next_message(source).await?;
        match msg.op {
            OpCode::InvalidSession => return Err(GatewayError::SessionRejected),
            OpCode::Dispatch if msg.event_type() == Some("READY") => {
                let data = msg
                    .d
                    .clone()
                    .ok_or_else(|| GatewayError::Decode("READY carried no data".to_string()))?;
                let ready: ReadyPayload = serde_json::from_value(data)
                    .map_err(|e| GatewayError::Decode(e.to_string()))?;
                return Ok((ready, msg.s));
            }
            _ => {}
        }
    }
}

/// Serialize and send one gateway message
async fn send_message(sink: &mut WsSink, message: &GatewayMessage) -> Result<(), GatewayError> {
    let text = message
        .to_json()
        .map_err(|e| GatewayError::Decode(e.to_string()))?;
    sink.send(WsMessage::Text(text)).await?;
    Ok(())
}

/// Read loop: answers heartbeats and forwards decoded events
///
/// Ends (dropping the event sender) on close, transport error, or a
/// server-requested reconnect.
async fn pump(
    mut sink: WsSink,
    mut source: WsSource,
    heartbeat_interval_ms: u64,
    mut last_seq: Option<u64>,
    api: Arc<ApiClient>,
    tx: mpsc::Sender<LogEvent>,
) {
    let mut heartbeat =
        tokio::time::interval(Duration::from_millis(heartbeat_interval_ms.max(1000)));
    heartbeat.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            frame = source.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        let msg = match GatewayMessage::from_json(&text) {
                            Ok(msg) => msg,
                            Err(e) => {
                                warn!(error = %e, "skipping malformed gateway message");
                                continue;
                            }
                        };
                        if let Some(s) = msg.s {
                            last_seq = Some(s);
                        }
                        match msg.op {
                            OpCode::Dispatch => {
                                if let Some(event) = decode_dispatch(msg, &api).await {
                                    if tx.send(event).await.is_err() {
                                        // Receiver is gone, nothing left to do
                                        return;
                                    }
                                }
                            }
                            OpCode::Heartbeat => {
                                if let Err(e) =
                                    send_message(&mut sink, &GatewayMessage::heartbeat(last_seq)).await
                                {
                                    error!(error = %e, "failed to answer heartbeat request");
                                    return;
                                }
                            }
                            OpCode::HeartbeatAck => {}
                            OpCode::Reconnect | OpCode::InvalidSession => {
                                error!("gateway invalidated the session; resume is not supported");
                                return;
                            }
                            _ => {}
                        }
                    }
                    Some(Ok(WsMessage::Close(frame))) => {
                        let reason = frame.map(|f| f.reason.to_string()).unwrap_or_default();
                        error!(reason = %reason, "gateway closed the connection");
                        return;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!(error = %e, "gateway transport error");
                        return;
                    }
                    None => {
                        error!("gateway stream ended");
                        return;
                    }
                }
            }
            _ = heartbeat.tick() => {
                if let Err(e) = send_message(&mut sink, &GatewayMessage::heartbeat(last_seq)).await {
                    error!(error = %e, "failed to send heartbeat");
                    return;
                }
            }
        }
    }
}

/// Decode one dispatch message into a domain event
///
/// Unknown event types and undecodable payloads are skipped with a log
/// line; message events are enriched with their channel name, and dropped
/// if the channel cannot be resolved.
async fn decode_dispatch(msg: GatewayMessage, api: &ApiClient) -> Option<LogEvent> {
    let event_type = EventType::parse(msg.event_type()?)?;
    let data = msg.d?;

    match event_type {
        // Only expected during the handshake
        EventType::Ready => None,
        EventType::AuditLogEntryCreate => {
            let payload: AuditLogEntryPayload = decode(data, event_type)?;
            Some(LogEvent::AuditLogEntryCreated(payload.into_entry()))
        }
        EventType::MessageUpdate => {
            let payload: MessageUpdatePayload = decode(data, event_type)?;
            let channel_name = channel_name(api, &payload.after).await?;
            Some(LogEvent::MessageEdited {
                before: payload.before.into_snapshot(channel_name.clone()),
                after: payload.after.into_snapshot(channel_name),
            })
        }
        EventType::MessageDelete => {
            let payload: MessagePayload = decode(data, event_type)?;
            let channel_name = channel_name(api, &payload).await?;
            Some(LogEvent::MessageDeleted(payload.into_snapshot(channel_name)))
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    data: serde_json::Value,
    event_type: EventType,
) -> Option<T> {
    match serde_json::from_value(data) {
        Ok(payload) => Some(payload),
        Err(e) => {
            warn!(event = event_type.as_str(), error = %e, "skipping undecodable dispatch");
            None
        }
    }
}

async fn channel_name(api: &ApiClient, message: &MessagePayload) -> Option<String> {
    match api.fetch_channel(message.channel_id).await {
        Ok(channel) => Some(channel.name),
        Err(e) => {
            warn!(
                channel_id = %message.channel_id,
                error = %e,
                "dropping message event, channel could not be resolved"
            );
            None
        }
    }
}

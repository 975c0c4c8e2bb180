//! Realtime change feed over the Supabase Phoenix websocket.
//!
//! Joins one channel subscribed to `postgres_changes` on the note table and
//! turns every change message into a payload-free [`ChangeEvent`]. The feed
//! reconnects after a fixed delay and stops once its receiver is dropped.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::store::{ChangeEvent, ChangeKind};

pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

const PROTOCOL_VERSION: &str = "1.0.0";
const CHANGE_BUFFER: usize = 64;

/// Envelope of every Phoenix channel frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoenixMessage {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
}

/// Websocket endpoint for a store config (`https` becomes `wss`).
pub fn websocket_url(config: &StoreConfig) -> Result<Url> {
    let mut url = Url::parse(&config.supabase_url)
        .map_err(|error| Error::Config(format!("Invalid supabase_url: {error}")))?;
    let scheme = match url.scheme() {
        "https" => "wss",
        "http" => "ws",
        other => {
            return Err(Error::Config(format!(
                "Unsupported supabase_url scheme '{other}'"
            )))
        }
    };
    url.set_scheme(scheme)
        .map_err(|()| Error::Config("Cannot derive websocket URL".to_string()))?;
    url.set_path("/realtime/v1/websocket");
    url.query_pairs_mut()
        .clear()
        .append_pair("apikey", &config.anon_key)
        .append_pair("vsn", PROTOCOL_VERSION);
    Ok(url)
}

/// Channel topic for the configured channel name
pub fn channel_topic(config: &StoreConfig) -> String {
    format!("realtime:{}", config.realtime_channel)
}

/// Join request subscribing to every change on `public.{table}`.
pub fn join_message(config: &StoreConfig, reference: &str) -> PhoenixMessage {
    PhoenixMessage {
        topic: channel_topic(config),
        event: "phx_join".to_string(),
        payload: json!({
            "config": {
                "broadcast": { "self": false },
                "presence": { "key": "" },
                "postgres_changes": [
                    { "event": "*", "schema": "public", "table": config.table }
                ]
            },
            "access_token": config.anon_key,
        }),
        reference: Some(reference.to_string()),
    }
}

pub fn heartbeat_message(reference: &str) -> PhoenixMessage {
    PhoenixMessage {
        topic: "phoenix".to_string(),
        event: "heartbeat".to_string(),
        payload: json!({}),
        reference: Some(reference.to_string()),
    }
}

/// Decode a text frame into a change notification.
///
/// Returns `None` for replies, heartbeats, presence traffic and anything
/// that does not parse.
pub fn parse_change(text: &str) -> Option<ChangeEvent> {
    let message: PhoenixMessage = serde_json::from_str(text).ok()?;
    if message.event != "postgres_changes" {
        return None;
    }
    let kind = match message.payload.pointer("/data/type")?.as_str()? {
        "INSERT" => ChangeKind::Insert,
        "UPDATE" => ChangeKind::Update,
        "DELETE" => ChangeKind::Delete,
        _ => return None,
    };
    Some(ChangeEvent::new(kind))
}

/// Join reply carrying an error status, if `message` is one.
fn join_error(message: &PhoenixMessage) -> Option<String> {
    if message.event != "phx_reply" {
        return None;
    }
    if message.payload.get("status").and_then(Value::as_str) != Some("error") {
        return None;
    }
    Some(
        message
            .payload
            .pointer("/response/reason")
            .and_then(Value::as_str)
            .unwrap_or("join rejected")
            .to_string(),
    )
}

/// Long-lived subscription to the note table's change channel
#[derive(Debug, Clone)]
pub struct RealtimeFeed {
    config: StoreConfig,
    url: Url,
    reconnect_delay: Duration,
}

impl RealtimeFeed {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        Ok(Self {
            url: websocket_url(config)?,
            config: config.clone(),
            reconnect_delay: RECONNECT_DELAY,
        })
    }

    #[must_use]
    pub const fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Start the feed in the background.
    ///
    /// Change notifications arrive on the returned receiver; dropping it
    /// shuts the connection down.
    pub fn subscribe(self) -> mpsc::Receiver<ChangeEvent> {
        let (tx, rx) = mpsc::channel(CHANGE_BUFFER);
        tokio::spawn(self.run(tx));
        rx
    }

    async fn run(self, tx: mpsc::Sender<ChangeEvent>) {
        let host = self.url.host_str().unwrap_or_default().to_string();
        loop {
            match self.session(&tx).await {
                Ok(()) if tx.is_closed() => break,
                Ok(()) => tracing::info!("Realtime connection to {} closed", host),
                Err(error) => tracing::warn!("Realtime connection to {} failed: {}", host, error),
            }

            tracing::debug!(
                "Reconnecting realtime feed in {} seconds",
                self.reconnect_delay.as_secs()
            );
            tokio::select! {
                () = tokio::time::sleep(self.reconnect_delay) => {}
                () = tx.closed() => break,
            }
        }
        tracing::debug!("Realtime feed stopped");
    }

    async fn session(&self, tx: &mpsc::Sender<ChangeEvent>) -> Result<()> {
        let (socket, _) = connect_async(self.url.as_str())
            .await
            .map_err(|error| Error::Realtime(error.to_string()))?;
        let (mut sink, mut stream) = socket.split();
        let mut next_ref: u64 = 1;

        let join = serde_json::to_string(&join_message(&self.config, &next_ref.to_string()))?;
        sink.send(Message::Text(join.into()))
            .await
            .map_err(|error| Error::Realtime(error.to_string()))?;
        tracing::info!("Joined realtime channel {}", channel_topic(&self.config));

        let mut heartbeat = interval_at(Instant::now() + HEARTBEAT_INTERVAL, HEARTBEAT_INTERVAL);
        loop {
            tokio::select! {
                () = tx.closed() => return Ok(()),
                _ = heartbeat.tick() => {
                    next_ref += 1;
                    let beat = serde_json::to_string(&heartbeat_message(&next_ref.to_string()))?;
                    sink.send(Message::Text(beat.into()))
                        .await
                        .map_err(|error| Error::Realtime(error.to_string()))?;
                }
                incoming = stream.next() => match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(event) = parse_change(&text) {
                            tracing::debug!("Realtime {:?} change", event.kind);
                            if tx.send(event).await.is_err() {
                                return Ok(());
                            }
                        } else if let Some(reason) = serde_json::from_str::<PhoenixMessage>(&text)
                            .ok()
                            .as_ref()
                            .and_then(join_error)
                        {
                            return Err(Error::Realtime(reason));
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        sink.send(Message::Pong(data))
                            .await
                            .map_err(|error| Error::Realtime(error.to_string()))?;
                    }
                    Some(Ok(Message::Close(_))) | None => return Ok(()),
                    Some(Ok(_)) => {}
                    Some(Err(error)) => return Err(Error::Realtime(error.to_string())),
                },
            }
        }
    }
}

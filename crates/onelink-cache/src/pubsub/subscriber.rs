//! Redis Pub/Sub subscriber
//!
//! One background task owns the Redis pub/sub connection. Subscription
//! changes reach it over a control channel; received messages fan out over a
//! broadcast channel. After a connection failure the task reconnects and
//! re-subscribes to everything it held before.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use onelink_core::LinkEvent;
use redis::Client;
use tokio::sync::{broadcast, mpsc, RwLock};

use crate::pubsub::PubSubChannel;

#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Subscriber task has stopped")]
    ChannelClosed,
}

pub type SubscriberResult<T> = Result<T, SubscriberError>;

/// A message received on a subscribed channel
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub channel: PubSubChannel,
    /// None when the payload is not a link event
    pub event: Option<LinkEvent>,
    pub payload: String,
}

impl ReceivedMessage {
    fn from_redis(channel_name: &str, payload: String) -> Self {
        Self {
            channel: PubSubChannel::parse(channel_name),
            event: serde_json::from_str(&payload).ok(),
            payload,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub redis_url: String,
    /// Capacity of the fan-out channel; slow receivers beyond it lag
    pub broadcast_buffer: usize,
    pub reconnect_delay: Duration,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            broadcast_buffer: 1024,
            reconnect_delay: Duration::from_secs(1),
        }
    }
}

#[derive(Debug)]
enum Command {
    Subscribe(Vec<String>),
    Unsubscribe(Vec<String>),
    Shutdown,
}

enum Exit {
    Shutdown,
    Disconnected,
}

pub struct Subscriber {
    subscribed: Arc<RwLock<HashSet<String>>>,
    broadcast_tx: broadcast::Sender<ReceivedMessage>,
    control_tx: mpsc::Sender<Command>,
}

impl Subscriber {
    /// Start the background listener
    #[must_use]
    pub fn spawn(config: SubscriberConfig) -> Self {
        let (broadcast_tx, _) = broadcast::channel(config.broadcast_buffer);
        let (control_tx, control_rx) = mpsc::channel(64);
        let subscribed = Arc::new(RwLock::new(HashSet::new()));

        tokio::spawn(Self::supervise(
            config,
            Arc::clone(&subscribed),
            broadcast_tx.clone(),
            control_rx,
        ));

        Self {
            subscribed,
            broadcast_tx,
            control_tx,
        }
    }

    async fn supervise(
        config: SubscriberConfig,
        subscribed: Arc<RwLock<HashSet<String>>>,
        broadcast_tx: broadcast::Sender<ReceivedMessage>,
        mut control_rx: mpsc::Receiver<Command>,
    ) {
        loop {
            match Self::listen(&config, &subscribed, &broadcast_tx, &mut control_rx).await {
                Ok(Exit::Shutdown) => {
                    tracing::info!("Subscriber shutting down");
                    return;
                }
                Ok(Exit::Disconnected) => {
                    tracing::warn!("Pub/Sub stream ended, reconnecting");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Subscriber error, reconnecting");
                }
            }
            tokio::time::sleep(config.reconnect_delay).await;
        }
    }

    async fn listen(
        config: &SubscriberConfig,
        subscribed: &RwLock<HashSet<String>>,
        broadcast_tx: &broadcast::Sender<ReceivedMessage>,
        control_rx: &mut mpsc::Receiver<Command>,
    ) -> SubscriberResult<Exit> {
        let client = Client::open(config.redis_url.as_str())?;
        let mut pubsub = client.get_async_pubsub().await?;

        for channel in subscribed.read().await.iter() {
            pubsub.subscribe(channel).await?;
        }
        tracing::info!("Subscriber connected to Redis");

        loop {
            // The message stream borrows the connection, so it is rebuilt
            // after every subscription change.
            let command = {
                let mut stream = pubsub.on_message();
                loop {
                    tokio::select! {
                        msg = stream.next() => {
                            let Some(msg) = msg else {
                                return Ok(Exit::Disconnected);
                            };
                            let payload: String = msg.get_payload().unwrap_or_default();
                            let received = ReceivedMessage::from_redis(msg.get_channel_name(), payload);
                            tracing::trace!(channel = %received.channel, "Received Pub/Sub message");
                            // No receivers is fine
                            let _ = broadcast_tx.send(received);
                        }
                        cmd = control_rx.recv() => break cmd,
                    }
                }
            };

            match command {
                Some(Command::Subscribe(channels)) => {
                    for channel in channels {
                        match pubsub.subscribe(&channel).await {
                            Ok(()) => {
                                tracing::debug!(channel = %channel, "Subscribed");
                                subscribed.write().await.insert(channel);
                            }
                            Err(e) => {
                                tracing::error!(channel = %channel, error = %e, "Failed to subscribe");
                            }
                        }
                    }
                }
                Some(Command::Unsubscribe(channels)) => {
                    for channel in channels {
                        if let Err(e) = pubsub.unsubscribe(&channel).await {
                            tracing::error!(channel = %channel, error = %e, "Failed to unsubscribe");
                        } else {
                            tracing::debug!(channel = %channel, "Unsubscribed");
                        }
                        subscribed.write().await.remove(&channel);
                    }
                }
                Some(Command::Shutdown) | None => return Ok(Exit::Shutdown),
            }
        }
    }

    async fn send(&self, command: Command) -> SubscriberResult<()> {
        self.control_tx
            .send(command)
            .await
            .map_err(|_| SubscriberError::ChannelClosed)
    }

    /// # Errors
    /// Fails when the background task has stopped
    pub async fn subscribe(&self, channels: &[PubSubChannel]) -> SubscriberResult<()> {
        self.send(Command::Subscribe(channels.iter().map(PubSubChannel::name).collect()))
            .await
    }

    /// # Errors
    /// Fails when the background task has stopped
    pub async fn unsubscribe(&self, channels: &[PubSubChannel]) -> SubscriberResult<()> {
        self.send(Command::Unsubscribe(channels.iter().map(PubSubChannel::name).collect()))
            .await
    }

    #[must_use]
    pub fn receiver(&self) -> broadcast::Receiver<ReceivedMessage> {
        self.broadcast_tx.subscribe()
    }

    pub async fn subscribed_channels(&self) -> Vec<String> {
        self.subscribed.read().await.iter().cloned().collect()
    }

    /// # Errors
    /// Fails when the background task has already stopped
    pub async fn shutdown(&self) -> SubscriberResult<()> {
        self.send(Command::Shutdown).await
    }
}

pub struct SubscriberBuilder {
    config: SubscriberConfig,
    initial_channels: Vec<PubSubChannel>,
}

impl SubscriberBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SubscriberConfig::default(),
            initial_channels: Vec::new(),
        }
    }

    #[must_use]
    pub fn redis_url(mut self, url: impl Into<String>) -> Self {
        self.config.redis_url = url.into();
        self
    }

    #[must_use]
    pub fn broadcast_buffer(mut self, size: usize) -> Self {
        self.config.broadcast_buffer = size;
        self
    }

    #[must_use]
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.config.reconnect_delay = delay;
        self
    }

    #[must_use]
    pub fn subscribe(mut self, channel: PubSubChannel) -> Self {
        self.initial_channels.push(channel);
        self
    }

    /// Start the subscriber with the initial channels queued
    ///
    /// # Errors
    /// Fails when the background task stops before accepting the channels
    pub async fn build(self) -> SubscriberResult<Subscriber> {
        let subscriber = Subscriber::spawn(self.config);
        if !self.initial_channels.is_empty() {
            subscriber.subscribe(&self.initial_channels).await?;
        }
        Ok(subscriber)
    }
}

impl Default for SubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

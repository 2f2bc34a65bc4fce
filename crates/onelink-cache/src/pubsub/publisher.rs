//! Publishes link change events to the owner's feed

use async_trait::async_trait;
use onelink_core::{DomainError, LinkEvent, LinkEventPublisher, RepoResult};
use redis::AsyncCommands;

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;

#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish a raw payload, returning the number of receivers
    ///
    /// # Errors
    /// Fails on Redis errors
    pub async fn publish_raw(&self, channel: &PubSubChannel, payload: &str) -> RedisResult<usize> {
        let mut conn = self.pool.get().await?;
        let receivers: usize = conn.publish(channel.name(), payload).await?;
        Ok(receivers)
    }

    /// # Errors
    /// Fails on serialization or Redis errors
    pub async fn publish_event(&self, event: &LinkEvent) -> RedisResult<usize> {
        let channel = PubSubChannel::links(event.user_id);
        let payload = serde_json::to_string(event)?;
        let receivers = self.publish_raw(&channel, &payload).await?;

        tracing::debug!(
            channel = %channel,
            event_type = event.event_type(),
            link_id = %event.link_id,
            receivers,
            "Published link event"
        );

        Ok(receivers)
    }
}

#[async_trait]
impl LinkEventPublisher for Publisher {
    async fn publish(&self, event: &LinkEvent) -> RepoResult<usize> {
        self.publish_event(event).await.map_err(DomainError::from)
    }
}

//! Subscriptions to owners' link feeds

use async_trait::async_trait;
use onelink_cache::{PubSubChannel, Subscriber, SubscriberResult};
use onelink_core::Snowflake;

/// Which `links:{user_id}` channels this process listens on
#[async_trait]
pub trait LinkFeeds: Send + Sync {
    async fn follow(&self, user_id: Snowflake) -> SubscriberResult<()>;

    async fn unfollow(&self, user_id: Snowflake) -> SubscriberResult<()>;
}

#[async_trait]
impl LinkFeeds for Subscriber {
    async fn follow(&self, user_id: Snowflake) -> SubscriberResult<()> {
        self.subscribe(&[PubSubChannel::links(user_id)]).await
    }

    async fn unfollow(&self, user_id: Snowflake) -> SubscriberResult<()> {
        self.unsubscribe(&[PubSubChannel::links(user_id)]).await
    }
}

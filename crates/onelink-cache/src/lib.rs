//! # onelink-cache
//!
//! Redis layer for refresh-token sessions and the per-user link change feed.
//!
//! - **Connection Pool**: deadpool-managed Redis connections
//! - **Sessions**: refresh token ids with expiry, revocable per token or per user
//! - **Pub/Sub**: `links:{user_id}` channels carrying [`onelink_core::LinkEvent`]s
//!
//! ```ignore
//! use onelink_cache::{Publisher, RedisPool, RedisPoolConfig, RefreshTokenStore};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let sessions = RefreshTokenStore::new(pool.clone());
//! let publisher = Publisher::new(pool);
//!
//! publisher.publish(&LinkEvent::created(link_id, user_id)).await?;
//! ```

pub mod pool;
pub mod pubsub;
pub mod session;

pub use pool::{
    create_shared_pool, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool,
};

pub use session::{RefreshTokenData, RefreshTokenStore};

pub use pubsub::{
    PubSubChannel, Publisher, ReceivedMessage, Subscriber, SubscriberBuilder, SubscriberConfig,
    SubscriberError, SubscriberResult, LINKS_CHANNEL_PREFIX,
};

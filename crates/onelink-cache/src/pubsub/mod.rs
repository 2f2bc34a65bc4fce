//! Redis Pub/Sub for link change events

mod channels;
mod publisher;
mod subscriber;

pub use channels::{PubSubChannel, LINKS_CHANNEL_PREFIX};
pub use publisher::Publisher;
pub use subscriber::{
    ReceivedMessage, Subscriber, SubscriberBuilder, SubscriberConfig, SubscriberError,
    SubscriberResult,
};

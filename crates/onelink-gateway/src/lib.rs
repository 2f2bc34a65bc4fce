//! # onelink-gateway
//!
//! WebSocket gateway that keeps an owner's link list live. After Identify the
//! socket receives a `LINKS_SNAPSHOT`, then a fresh one for every change
//! published on the owner's `links:{user_id}` feed.

pub mod broadcast;
pub mod connection;
pub mod events;
pub mod handlers;
pub mod protocol;
pub mod server;

#[cfg(test)]
pub(crate) mod test_support;

pub use server::{create_app, create_gateway_state, run, GatewayState};

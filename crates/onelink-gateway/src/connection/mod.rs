//! Connection tracking

mod connection;
mod manager;

pub use connection::{Connection, ConnectionState, Outbound, SendError};
pub use manager::{Binding, ConnectionManager};

//! Fan-out of link feed changes to connected sockets

mod dispatcher;
mod feeds;
mod snapshot;

pub use dispatcher::EventDispatcher;
pub use feeds::LinkFeeds;
pub use snapshot::{SnapshotError, SnapshotLoader};

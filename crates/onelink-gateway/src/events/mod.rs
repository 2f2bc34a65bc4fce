//! Events dispatched to clients

mod snapshot;

pub use snapshot::{LinksSnapshotEvent, LINKS_SNAPSHOT};

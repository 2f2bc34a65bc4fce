//! Link change events carried on each owner's feed

mod link_event;

pub use link_event::{LinkEvent, LinkEventKind};

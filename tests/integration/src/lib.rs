//! Integration test utilities for OneLink
//!
//! Helpers for running end-to-end tests against the REST API and the link
//! gateway.

pub mod helpers;
pub mod fixtures;

pub use helpers::*;
pub use fixtures::*;

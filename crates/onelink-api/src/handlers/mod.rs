//! Route handlers
//!
//! All HTTP request handlers organized by resource.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod links;
pub mod navigation;
pub mod profiles;
pub mod users;

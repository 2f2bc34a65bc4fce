//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of one
//! request.

pub mod auth;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod link;
pub mod profile;
pub mod public_profile;
pub mod validation;

#[cfg(test)]
pub(crate) mod fakes;

pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use dashboard::DashboardService;
pub use error::{ServiceError, ServiceResult};
pub use link::LinkService;
pub use profile::ProfileService;
pub use public_profile::PublicProfileService;

//! # onelink-service
//!
//! Application layer: the use cases behind every screen, the outbound
//! Discord and Google clients, and the request/response DTOs.

pub mod clients;
pub mod dto;
pub mod services;

pub use clients::{
    DiscordClient, DiscordError, GoogleIdentityVerifier, HttpDiscordClient, IdentityError,
    IdentityVerifier, VerifiedIdentity,
};
pub use services::{
    AuthService, DashboardService, LinkService, ProfileService, PublicProfileService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};

//! Refresh token sessions stored in Redis

mod refresh_token;

pub use refresh_token::{RefreshTokenData, RefreshTokenStore};

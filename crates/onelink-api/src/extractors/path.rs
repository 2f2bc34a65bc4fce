//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use onelink_core::Snowflake;
use serde::Deserialize;

use crate::response::ApiError;

#[derive(Debug, Deserialize)]
struct LinkIdParams {
    link_id: String,
}

/// `:link_id` parsed as a Snowflake
#[derive(Debug, Clone, Copy)]
pub struct LinkIdPath(pub Snowflake);

#[async_trait]
impl<S> FromRequestParts<S> for LinkIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<LinkIdParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        params
            .link_id
            .parse()
            .map(LinkIdPath)
            .map_err(|_| ApiError::invalid_path("Invalid link_id format"))
    }
}

#[derive(Debug, Deserialize)]
struct UsernameParams {
    username: String,
}

/// `:username` as given; handles are normalised by the service
#[derive(Debug, Clone)]
pub struct UsernamePath(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for UsernamePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<UsernameParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        Ok(UsernamePath(params.username))
    }
}

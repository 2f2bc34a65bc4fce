//! Public profile and catalog handlers

use axum::{extract::State, Json};
use onelink_service::dto::{PublicProfileResponse, SocialPlatformResponse};
use onelink_service::{ProfileService, PublicProfileService};

use crate::extractors::UsernamePath;
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /profiles/:username
pub async fn get_public_profile(
    State(state): State<AppState>,
    UsernamePath(username): UsernamePath,
) -> ApiResult<Json<PublicProfileResponse>> {
    let profile = PublicProfileService::new(state.service_context())
        .view(&username)
        .await?;
    Ok(Json(profile))
}

/// GET /social-platforms
pub async fn list_social_platforms() -> Json<Vec<SocialPlatformResponse>> {
    Json(ProfileService::social_platforms())
}

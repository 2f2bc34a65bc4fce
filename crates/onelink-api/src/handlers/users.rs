//! Handlers for the caller's own profile

use axum::{extract::State, Json};
use onelink_service::dto::{
    ClaimHandleRequest, ProfileUpdatedResponse, UpdateProfileRequest, UserResponse,
};
use onelink_service::ProfileService;

use crate::extractors::{AuthUser, JsonBody};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let user = ProfileService::new(state.service_context())
        .me(auth.user_id)
        .await?;
    Ok(Json(user))
}

/// Claim a handle for an account without a profile
///
/// POST /users/@me/handle
pub async fn claim_handle(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<ClaimHandleRequest>,
) -> ApiResult<Created<Json<UserResponse>>> {
    let user = ProfileService::new(state.service_context())
        .claim_handle(auth.user_id, request)
        .await?;
    Ok(Created(Json(user)))
}

/// PUT /users/@me/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileUpdatedResponse>> {
    let response = ProfileService::new(state.service_context())
        .update_profile(auth.user_id, request)
        .await?;
    Ok(Json(response))
}

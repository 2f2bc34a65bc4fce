//! Authentication handlers
//!
//! Endpoints for registration, password and Google sign-in, token refresh,
//! and logout.

use axum::{extract::State, Json};
use onelink_service::dto::{
    AuthResponse, GoogleLoginRequest, LoginRequest, LogoutRequest, RefreshTokenRequest,
    RegisterRequest,
};
use onelink_service::AuthService;

use crate::extractors::{AuthUser, JsonBody, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Register an account and its profile
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> ApiResult<Created<Json<AuthResponse>>> {
    let response = AuthService::new(state.service_context())
        .register(request)
        .await?;
    Ok(Created(Json(response)))
}

/// Sign in with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = AuthService::new(state.service_context()).login(request).await?;
    Ok(Json(response))
}

/// Sign in with a Google ID token
///
/// POST /auth/google
pub async fn google_login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<GoogleLoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = AuthService::new(state.service_context())
        .google_login(request)
        .await?;
    Ok(Json(response))
}

/// Rotate the refresh token
///
/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = AuthService::new(state.service_context()).refresh(request).await?;
    Ok(Json(response))
}

/// Revoke one session
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LogoutRequest>,
) -> ApiResult<NoContent> {
    AuthService::new(state.service_context()).logout(request).await?;
    Ok(NoContent)
}

/// Revoke every session of the caller
///
/// POST /auth/logout-all
pub async fn logout_all(State(state): State<AppState>, auth: AuthUser) -> ApiResult<NoContent> {
    AuthService::new(state.service_context())
        .logout_all(auth.user_id)
        .await?;
    Ok(NoContent)
}

//! Route definitions
//!
//! API routes are mounted under /api/v1. The short link redirect and the
//! health checks live at the root.

use axum::{
    http::Uri,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{auth, dashboard, health, links, navigation, profiles, users};
use crate::response::ApiError;
use crate::state::AppState;

/// Create the main router (health checks are added separately so they skip
/// rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", api_v1_routes())
        .route("/l/:link_id", get(links::follow_link))
        .fallback(not_found)
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(link_routes())
        .merge(public_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/google", post(auth::google_login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/logout-all", post(auth::logout_all))
}

/// The caller's profile and dashboard
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/@me", get(users::get_current_user))
        .route("/users/@me/handle", post(users::claim_handle))
        .route("/users/@me/profile", put(users::update_profile))
        .route("/dashboard", get(dashboard::get_dashboard))
}

/// Link routes
fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(links::list_links).post(links::create_link))
        .route("/links/:link_id", delete(links::delete_link))
        .route("/links/:link_id/open", post(links::open_link))
}

/// Routes open to anonymous visitors
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/profiles/:username", get(profiles::get_public_profile))
        .route("/social-platforms", get(profiles::list_social_platforms))
        .route("/navigation", get(navigation::resolve))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

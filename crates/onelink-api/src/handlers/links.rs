//! Link handlers

use axum::{extract::State, Json};
use onelink_service::dto::{CreateLinkRequest, LinkResponse, OpenLinkResponse};
use onelink_service::LinkService;

use crate::extractors::{AuthUser, JsonBody, LinkIdPath};
use crate::response::{ApiResult, Created, NoContent, TemporaryRedirect};
use crate::state::AppState;

/// POST /links
pub async fn create_link(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<CreateLinkRequest>,
) -> ApiResult<Created<Json<LinkResponse>>> {
    let link = LinkService::new(state.service_context())
        .create(auth.user_id, request)
        .await?;
    Ok(Created(Json(link)))
}

/// The caller's links, newest first
///
/// GET /links
pub async fn list_links(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<LinkResponse>>> {
    let links = LinkService::new(state.service_context())
        .list(auth.user_id)
        .await?;
    Ok(Json(links))
}

/// DELETE /links/:link_id
pub async fn delete_link(
    State(state): State<AppState>,
    auth: AuthUser,
    LinkIdPath(link_id): LinkIdPath,
) -> ApiResult<NoContent> {
    LinkService::new(state.service_context())
        .delete(auth.user_id, link_id)
        .await?;
    Ok(NoContent)
}

/// Count a click; the client navigates to the returned url
///
/// POST /links/:link_id/open
pub async fn open_link(
    State(state): State<AppState>,
    LinkIdPath(link_id): LinkIdPath,
) -> ApiResult<Json<OpenLinkResponse>> {
    let opened = LinkService::new(state.service_context())
        .open(link_id)
        .await?;
    Ok(Json(opened))
}

/// Count a click and redirect
///
/// GET /l/:link_id
pub async fn follow_link(
    State(state): State<AppState>,
    LinkIdPath(link_id): LinkIdPath,
) -> ApiResult<TemporaryRedirect> {
    let opened = LinkService::new(state.service_context())
        .open(link_id)
        .await?;
    TemporaryRedirect::to(&opened.url)
}

//! Navigation gate

use axum::{
    extract::Query,
    Json,
};
use onelink_core::resolve_route;
use onelink_service::dto::{NavigationQuery, NavigationResponse};

use crate::extractors::OptionalAuthUser;

/// What the client should render for a path
///
/// GET /navigation?path=/dashboard
pub async fn resolve(
    auth: OptionalAuthUser,
    Query(query): Query<NavigationQuery>,
) -> Json<NavigationResponse> {
    let authenticated = auth.is_authenticated();
    Json(NavigationResponse {
        decision: resolve_route(&query.path, authenticated),
        path: query.path,
        authenticated,
    })
}

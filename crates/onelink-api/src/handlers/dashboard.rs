//! Dashboard handler

use axum::{
    extract::{Query, State},
    Json,
};
use onelink_service::dto::{DashboardQuery, DashboardResponse};
use onelink_service::DashboardService;

use crate::extractors::AuthUser;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /dashboard?section=links|overview|appearance|settings
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<DashboardQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<Json<DashboardResponse>> {
    let Query(query) = query.map_err(|e| ApiError::invalid_query(e.body_text()))?;
    let response = DashboardService::new(state.service_context())
        .section(auth.user_id, query.section)
        .await?;
    Ok(Json(response))
}

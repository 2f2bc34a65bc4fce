//! Dashboard service - one payload per dashboard section

use chrono::Utc;
use onelink_core::{Link, Snowflake, User};
use tracing::instrument;

use crate::dto::{
    DashboardContent, DashboardResponse, DashboardSection, LinkResponse, OverviewStats,
    UserResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::profile::ProfileService;

pub struct DashboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DashboardService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn section(
        &self,
        user_id: Snowflake,
        section: DashboardSection,
    ) -> ServiceResult<DashboardResponse> {
        let user = ProfileService::new(self.ctx).load(user_id).await?;

        let content = match section {
            DashboardSection::Links => {
                let links = self.ctx.link_repo().find_by_owner(user_id).await?;
                DashboardContent::Links {
                    links: links.iter().map(LinkResponse::from).collect(),
                }
            }
            DashboardSection::Overview => {
                let links = self.ctx.link_repo().find_by_owner(user_id).await?;
                DashboardContent::Overview(overview(&user, &links))
            }
            DashboardSection::Appearance | DashboardSection::Settings => {
                DashboardContent::Placeholder { placeholder: true }
            }
        };

        Ok(DashboardResponse {
            user: UserResponse::from(user),
            section,
            content,
        })
    }
}

/// Totals across the owner's links, averaged over whole days since sign-up
fn overview(user: &User, links: &[Link]) -> OverviewStats {
    let total_clicks: i64 = links.iter().map(|l| l.clicks).sum();
    #[allow(clippy::cast_precision_loss)]
    let avg_clicks_per_day = total_clicks as f64 / user.days_active(Utc::now()) as f64;

    OverviewStats {
        total_links: links.len(),
        total_clicks,
        avg_clicks_per_day,
    }
}

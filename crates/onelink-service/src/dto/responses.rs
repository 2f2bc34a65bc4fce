//! Response DTOs for API endpoints
//!
//! Snowflake IDs are serialized as strings. Timestamps use RFC 3339 with
//! millisecond precision and a `Z` suffix, so their string order is time order.

use chrono::{DateTime, Utc};
use onelink_core::{LinkType, RouteDecision};
use serde::Serialize;

use super::requests::DashboardSection;

/// How long the client shows the profile save notice
pub const PROFILE_SAVED_DISMISS_MS: u64 = 3000;

pub(crate) mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

// ============================================================================
// Auth Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    /// None for a federated account that has not claimed a handle
    pub user: Option<UserResponse>,
    pub needs_handle: bool,
}

// ============================================================================
// User Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLinkResponse {
    pub platform: String,
    pub url: String,
    pub icon: String,
}

/// The caller's own profile
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub avatar: String,
    pub social_links: Vec<SocialLinkResponse>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdatedResponse {
    pub user: UserResponse,
    pub message: String,
    pub dismiss_after_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialPlatformResponse {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
}

// ============================================================================
// Link Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LinkResponse {
    pub id: String,
    pub title: String,
    pub url: String,
    pub description: String,
    pub user_id: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub clicks: i64,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_id: Option<String>,
}

/// Where the client should navigate after a click was counted
#[derive(Debug, Clone, Serialize)]
pub struct OpenLinkResponse {
    pub url: String,
    pub clicks: i64,
}

// ============================================================================
// Dashboard Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewStats {
    pub total_links: usize,
    pub total_clicks: i64,
    pub avg_clicks_per_day: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DashboardContent {
    Links { links: Vec<LinkResponse> },
    Overview(OverviewStats),
    Placeholder { placeholder: bool },
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub user: UserResponse,
    pub section: DashboardSection,
    pub content: DashboardContent,
}

// ============================================================================
// Public Profile Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DiscordProfileResponse {
    pub id: String,
    pub username: String,
    pub tag: String,
    pub avatar_url: String,
    pub banner: Option<String>,
    pub accent_color: Option<u32>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicProfileResponse {
    pub username: String,
    pub bio: String,
    pub avatar: String,
    pub social_links: Vec<SocialLinkResponse>,
    /// Custom links, newest first
    pub links: Vec<LinkResponse>,
    /// Present only when a Discord link exists and the lookup succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord: Option<DiscordProfileResponse>,
}

// ============================================================================
// Navigation
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct NavigationResponse {
    pub path: String,
    pub authenticated: bool,
    #[serde(flatten)]
    pub decision: RouteDecision,
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

fn health_label(healthy: bool) -> String {
    if healthy { "healthy" } else { "unhealthy" }.to_string()
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        Self {
            status: if database_healthy && redis_healthy {
                "ready"
            } else {
                "not_ready"
            }
            .to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: health_label(database_healthy),
                redis: health_label(redis_healthy),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamps_have_fixed_width() {
        let health = HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(json["timestamp"], "2024-05-01T12:00:00.000Z");
    }

    #[test]
    fn test_dashboard_content_shapes() {
        let placeholder = serde_json::to_value(DashboardContent::Placeholder { placeholder: true }).unwrap();
        assert_eq!(placeholder, serde_json::json!({ "placeholder": true }));

        let overview = serde_json::to_value(DashboardContent::Overview(OverviewStats {
            total_links: 2,
            total_clicks: 10,
            avg_clicks_per_day: 5.0,
        }))
        .unwrap();
        assert_eq!(overview["total_clicks"], 10);
    }

    #[test]
    fn test_readiness_response() {
        let ready = ReadinessResponse::ready(true, true);
        assert!(ready.is_ready());

        let degraded = ReadinessResponse::ready(true, false);
        assert_eq!(degraded.status, "not_ready");
        assert_eq!(degraded.checks.redis, "unhealthy");
    }
}

//! Test fixtures and data generators

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per process run, short enough for a 20 character handle
pub fn unique_suffix() -> String {
    let run = chrono::Utc::now().timestamp_millis() & 0xff_ffff_ffff;
    format!("{run:x}{}", COUNTER.fetch_add(1, Ordering::SeqCst))
}

pub const TEST_PASSWORD: &str = "TestPass123!";

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            username: format!("u{suffix}"),
            email: format!("test{suffix}@example.com"),
            password: TEST_PASSWORD.to_string(),
            confirm_password: TEST_PASSWORD.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: Option<UserResponse>,
    pub needs_handle: bool,
}

#[derive(Debug, Deserialize)]
pub struct SocialLinkResponse {
    pub platform: String,
    pub url: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub avatar: String,
    pub social_links: Vec<SocialLinkResponse>,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdatedResponse {
    pub user: UserResponse,
    pub message: String,
    pub dismiss_after_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct LinkResponse {
    pub id: String,
    pub title: String,
    pub url: String,
    pub description: String,
    pub user_id: String,
    pub created_at: String,
    pub clicks: i64,
    #[serde(rename = "type")]
    pub link_type: String,
    pub discord_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OpenLinkResponse {
    pub url: String,
    pub clicks: i64,
}

#[derive(Debug, Deserialize)]
pub struct PublicProfileResponse {
    pub username: String,
    pub bio: String,
    pub avatar: String,
    pub social_links: Vec<SocialLinkResponse>,
    pub links: Vec<LinkResponse>,
}

#[derive(Debug, Deserialize)]
pub struct SocialPlatformResponse {
    pub key: String,
    pub name: String,
    pub icon: String,
}

/// Body for `POST /links` creating a custom link
pub fn custom_link(title: &str, url: &str) -> Value {
    json!({ "kind": "custom", "title": title, "url": url })
}

/// Body for `POST /links` creating a Discord card
pub fn discord_link(discord_id: &str) -> Value {
    json!({ "kind": "discord", "discord_id": discord_id })
}

/// Body for `PUT /users/@me/profile`
pub fn profile_update(bio: &str, socials: &[(&str, &str)]) -> Value {
    let social_links: Vec<Value> = socials
        .iter()
        .map(|(platform, url)| json!({ "platform": platform, "url": url }))
        .collect();
    json!({ "bio": bio, "avatar": "", "social_links": social_links })
}

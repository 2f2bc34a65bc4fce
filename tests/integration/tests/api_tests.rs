//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance with the schema applied
//!   (or DATABASE_MIGRATIONS_DIR set)
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error_code, assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Register a fresh account and return its request and tokens
async fn register(server: &TestServer) -> (RegisterRequest, AuthResponse) {
    let request = RegisterRequest::unique();
    let response = server.post("/auth/register", &request).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    (request, auth)
}

async fn create_link(server: &TestServer, token: &str, body: &Value) -> LinkResponse {
    let response = server.post_auth("/links", token, body).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
    assert_eq!(body["checks"]["redis"], "healthy");
}

#[tokio::test]
async fn test_unknown_route() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/nope").await.unwrap();
    let code = assert_error_code(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "NOT_FOUND");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, auth) = register(&server).await;

    let user = auth.user.expect("register returns the profile");
    assert_eq!(user.username, request.username);
    assert_eq!(user.email, request.email);
    assert!(user.bio.is_empty());
    assert!(user.social_links.is_empty());
    assert_eq!(auth.token_type, "Bearer");
    assert!(auth.expires_in > 0);
    assert!(!auth.needs_handle);
    assert!(!auth.access_token.is_empty());
    assert!(!auth.refresh_token.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (first, _) = register(&server).await;

    let mut again = RegisterRequest::unique();
    again.email = first.email.to_uppercase();
    let response = server.post("/auth/register", &again).await.unwrap();
    let code = assert_error_code(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "EMAIL_ALREADY_IN_USE");
}

#[tokio::test]
async fn test_register_duplicate_username() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (first, _) = register(&server).await;

    let mut again = RegisterRequest::unique();
    again.username = first.username.clone();
    let response = server.post("/auth/register", &again).await.unwrap();
    let code = assert_error_code(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "USERNAME_TAKEN");
}

#[tokio::test]
async fn test_register_validation() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let mut mismatch = RegisterRequest::unique();
    mismatch.confirm_password = "SomethingElse1".to_string();
    let response = server.post("/auth/register", &mismatch).await.unwrap();
    let code = assert_error_code(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "PASSWORD_MISMATCH");

    let mut bad_handle = RegisterRequest::unique();
    bad_handle.username = "no spaces allowed".to_string();
    let response = server.post("/auth/register", &bad_handle).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_login_user() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = register(&server).await;

    let login = LoginRequest::from_register(&request);
    let response = server.post("/auth/login", &login).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(auth.user.expect("profile").username, request.username);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = register(&server).await;

    let login = LoginRequest {
        email: request.email.clone(),
        password: "WrongPassword1".to_string(),
    };
    let response = server.post("/auth/login", &login).await.unwrap();
    let code = assert_error_code(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIALS");

    let unknown = LoginRequest {
        email: format!("missing{}@example.com", unique_suffix()),
        password: TEST_PASSWORD.to_string(),
    };
    let response = server.post("/auth/login", &unknown).await.unwrap();
    let code = assert_error_code(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;

    let request = RefreshTokenRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let response = server.post("/auth/refresh", &request).await.unwrap();
    let rotated: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(rotated.refresh_token, auth.refresh_token);

    // The old refresh token was consumed
    let response = server.post("/auth/refresh", &request).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;

    let request = RefreshTokenRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let response = server.post("/auth/logout", &request).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.post("/auth/refresh", &request).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_logout_all() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, first) = register(&server).await;
    let login = LoginRequest::from_register(&request);
    let response = server.post("/auth/login", &login).await.unwrap();
    let second: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let response = server
        .post_auth("/auth/logout-all", &second.access_token, &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    for auth in [first, second] {
        let body = RefreshTokenRequest {
            refresh_token: auth.refresh_token,
        };
        let response = server.post("/auth/refresh", &body).await.unwrap();
        assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
    }
}

#[tokio::test]
async fn test_google_sign_in_rejects_garbage() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post("/auth/google", &json!({ "id_token": "not-a-google-token" }))
        .await
        .unwrap();
    let status = response.status();
    assert!(
        status == StatusCode::UNAUTHORIZED || status == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status {status}"
    );
}

// ============================================================================
// Profile Tests
// ============================================================================

#[tokio::test]
async fn test_get_current_user() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, auth) = register(&server).await;

    let response = server.get_auth("/users/@me", &auth.access_token).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.username, request.username);
}

#[tokio::test]
async fn test_unauthorized_access() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/users/@me").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get_auth("/links", "invalid-token").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_update_profile() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;

    let body = profile_update(
        "  Building things  ",
        &[
            ("github", "https://github.com/example"),
            ("twitter", "https://twitter.com/example"),
        ],
    );
    let response = server
        .put_auth("/users/@me/profile", &auth.access_token, &body)
        .await
        .unwrap();
    let updated: ProfileUpdatedResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(updated.dismiss_after_ms, 3000);
    assert!(!updated.message.is_empty());
    assert_eq!(updated.user.bio, "Building things");
    let platforms: Vec<_> = updated
        .user
        .social_links
        .iter()
        .map(|s| s.platform.as_str())
        .collect();
    assert_eq!(platforms, ["github", "twitter"]);
    assert!(updated.user.social_links[0].icon.contains("fa-github"));
}

#[tokio::test]
async fn test_update_profile_rejects_unknown_platform() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;

    let body = profile_update("", &[("myspace", "https://myspace.com/example")]);
    let response = server
        .put_auth("/users/@me/profile", &auth.access_token, &body)
        .await
        .unwrap();
    let code = assert_error_code(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PLATFORM");
}

#[tokio::test]
async fn test_claim_handle_when_profile_exists() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;

    let body = json!({ "username": format!("h{}", unique_suffix()) });
    let response = server
        .post_auth("/users/@me/handle", &auth.access_token, &body)
        .await
        .unwrap();
    let code = assert_error_code(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "PROFILE_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_dashboard_sections() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;
    let link = create_link(&server, &auth.access_token, &custom_link("Blog", "https://blog.example.com")).await;
    let response = server
        .post(&format!("/links/{}/open", link.id), &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_auth("/dashboard?section=overview", &auth.access_token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["section"], "overview");
    assert_eq!(body["content"]["total_links"], 1);
    assert_eq!(body["content"]["total_clicks"], 1);

    let response = server
        .get_auth("/dashboard?section=settings", &auth.access_token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["content"]["placeholder"], true);
}

// ============================================================================
// Link Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_list_links() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;

    let first = create_link(&server, &auth.access_token, &custom_link("First", "https://one.example.com")).await;
    let second = create_link(&server, &auth.access_token, &custom_link("Second", "https://two.example.com")).await;

    assert_eq!(first.link_type, "custom");
    assert_eq!(first.clicks, 0);
    assert!(first.discord_id.is_none());
    assert_eq!(second.title, "Second");

    let response = server.get_auth("/links", &auth.access_token).await.unwrap();
    let links: Vec<LinkResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let ids: Vec<_> = links.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, [second.id.as_str(), first.id.as_str()]);
}

#[tokio::test]
async fn test_create_link_validation() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;

    let response = server
        .post_auth("/links", &auth.access_token, &custom_link("", "https://example.com"))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post_auth("/links", &auth.access_token, &custom_link("Home", "example.com"))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    for url in ["https://example.com/a\nb", "https://example.com/a\rb"] {
        let response = server
            .post_auth("/links", &auth.access_token, &custom_link("Home", url))
            .await
            .unwrap();
        let code = assert_error_code(response, StatusCode::BAD_REQUEST).await.unwrap();
        assert_eq!(code, "VALIDATION_ERROR");
    }

    let response = server
        .post_auth("/links", &auth.access_token, &discord_link(""))
        .await
        .unwrap();
    let code = assert_error_code(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "DISCORD_ID_REQUIRED");

    let response = server
        .post_auth("/links", &auth.access_token, &discord_link("not-a-snowflake"))
        .await
        .unwrap();
    let code = assert_error_code(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_DISCORD_ID");
}

#[tokio::test]
async fn test_discord_link() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;

    let link = create_link(&server, &auth.access_token, &discord_link("80351110224678912")).await;
    assert_eq!(link.link_type, "discord");
    assert_eq!(link.discord_id.as_deref(), Some("80351110224678912"));
}

#[tokio::test]
async fn test_delete_link() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, owner) = register(&server).await;
    let (_, other) = register(&server).await;
    let link = create_link(&server, &owner.access_token, &custom_link("Temp", "https://temp.example.com")).await;
    let path = format!("/links/{}", link.id);

    let response = server.delete_auth(&path, &other.access_token).await.unwrap();
    let code = assert_error_code(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_LINK_OWNER");

    let response = server.delete_auth(&path, &owner.access_token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.delete_auth(&path, &owner.access_token).await.unwrap();
    let code = assert_error_code(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "LINK_NOT_FOUND");
}

#[tokio::test]
async fn test_open_link_counts_clicks() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;
    let link = create_link(&server, &auth.access_token, &custom_link("Shop", "https://shop.example.com")).await;
    let path = format!("/links/{}/open", link.id);

    for expected in 1..=3 {
        let response = server.post(&path, &json!({})).await.unwrap();
        let opened: OpenLinkResponse = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(opened.url, "https://shop.example.com");
        assert_eq!(opened.clicks, expected);
    }

    let response = server
        .post("/links/123456789/open", &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_short_link_redirects() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;
    let link = create_link(&server, &auth.access_token, &custom_link("Docs", "https://docs.example.com")).await;

    let response = server.get(&format!("/l/{}", link.id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers()["location"].to_str().unwrap(),
        "https://docs.example.com"
    );

    let response = server.get_auth("/links", &auth.access_token).await.unwrap();
    let links: Vec<LinkResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(links[0].clicks, 1);
}

// ============================================================================
// Public Tests
// ============================================================================

#[tokio::test]
async fn test_public_profile() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, auth) = register(&server).await;
    create_link(&server, &auth.access_token, &custom_link("Portfolio", "https://me.example.com")).await;

    let response = server
        .get(&format!("/profiles/{}", request.username.to_uppercase()))
        .await
        .unwrap();
    let profile: PublicProfileResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile.username, request.username);
    assert_eq!(profile.links.len(), 1);
    assert_eq!(profile.links[0].title, "Portfolio");
}

#[tokio::test]
async fn test_public_profile_not_found() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get(&format!("/profiles/ghost{}", unique_suffix()))
        .await
        .unwrap();
    let code = assert_error_code(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "PROFILE_NOT_FOUND");
}

#[tokio::test]
async fn test_social_platforms() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/social-platforms").await.unwrap();
    let platforms: Vec<SocialPlatformResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    let keys: Vec<_> = platforms.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(
        keys,
        ["facebook", "instagram", "twitter", "youtube", "tiktok", "github", "linkedin"]
    );
    assert_eq!(platforms[3].name, "YouTube");
    assert!(platforms.iter().all(|p| !p.icon.is_empty()));
}

#[tokio::test]
async fn test_navigation_gate() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = register(&server).await;

    let response = server.get("/navigation?path=/dashboard").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["action"], "redirect");
    assert_eq!(body["to"], "/");

    let response = server
        .get_auth("/navigation?path=/", &auth.access_token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["action"], "redirect");
}

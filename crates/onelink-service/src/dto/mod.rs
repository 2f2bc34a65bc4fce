//! Data transfer objects for API requests and responses

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    ClaimHandleRequest, CreateLinkRequest, DashboardQuery, DashboardSection, GoogleLoginRequest,
    LoginRequest, LogoutRequest, NavigationQuery, RefreshTokenRequest, RegisterRequest,
    SocialLinkInput, UpdateProfileRequest,
};

pub use responses::{
    AuthResponse, DashboardContent, DashboardResponse, DiscordProfileResponse, HealthChecks,
    HealthResponse, LinkResponse, NavigationResponse, OpenLinkResponse, OverviewStats,
    ProfileUpdatedResponse, PublicProfileResponse, ReadinessResponse, SocialLinkResponse,
    SocialPlatformResponse, UserResponse, PROFILE_SAVED_DISMISS_MS,
};

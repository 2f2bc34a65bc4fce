//! Profile service - the caller's own profile and the profile editor

use onelink_core::{
    normalize_handle, validate_username, DomainError, SocialLink, SocialPlatform, Snowflake, User,
};
use tracing::{error, info, instrument};

use crate::dto::{
    ClaimHandleRequest, ProfileUpdatedResponse, SocialPlatformResponse, UpdateProfileRequest,
    UserResponse, PROFILE_SAVED_DISMISS_MS,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::validation::{check_max_chars, check_url, BIO_MAX_LENGTH};

pub const PROFILE_SAVED_MESSAGE: &str = "Profile updated";

pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load the caller's profile
    #[instrument(skip(self))]
    pub async fn me(&self, user_id: Snowflake) -> ServiceResult<UserResponse> {
        Ok(UserResponse::from(self.load(user_id).await?))
    }

    pub(crate) async fn load(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::ProfileNotFound(user_id.to_string()).into())
    }

    /// Create the profile of an account that signed up without one
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn claim_handle(
        &self,
        user_id: Snowflake,
        request: ClaimHandleRequest,
    ) -> ServiceResult<UserResponse> {
        validate_username(&request.username)?;
        let username = normalize_handle(&request.username);

        if self.ctx.user_repo().find_by_id(user_id).await?.is_some() {
            return Err(DomainError::ProfileAlreadyExists.into());
        }
        if self.ctx.user_repo().username_exists(&username).await? {
            return Err(DomainError::UsernameTaken(username).into());
        }

        let account = self
            .ctx
            .account_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::AccountNotFound(user_id))?;

        let user = User::new(user_id, &username, account.email);
        self.ctx.user_repo().create(&user).await?;

        info!(user_id = %user_id, "Handle claimed");
        Ok(UserResponse::from(user))
    }

    /// Replace bio, avatar and social links in one write
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: Snowflake,
        request: UpdateProfileRequest,
    ) -> ServiceResult<ProfileUpdatedResponse> {
        let (bio, avatar, social_links) = parse_profile(request)?;

        let saved = async {
            let mut user = self.load(user_id).await?;
            user.update_profile(bio, avatar, social_links);
            self.ctx.user_repo().update_profile(&user).await?;
            Ok::<_, ServiceError>(user)
        }
        .await
        .map_err(|e| match e.as_domain() {
            Some(d) if d.is_validation() || d.is_not_found() => e,
            _ => {
                error!(user_id = %user_id, error = %e, "Failed to save profile");
                ServiceError::ProfileSaveFailed
            }
        })?;

        info!(user_id = %user_id, links = saved.social_links.len(), "Profile updated");

        Ok(ProfileUpdatedResponse {
            user: UserResponse::from(saved),
            message: PROFILE_SAVED_MESSAGE.to_string(),
            dismiss_after_ms: PROFILE_SAVED_DISMISS_MS,
        })
    }

    /// The fixed platform catalog, in display order
    pub fn social_platforms() -> Vec<SocialPlatformResponse> {
        SocialPlatform::ALL
            .into_iter()
            .map(SocialPlatformResponse::from)
            .collect()
    }
}

/// Validate the editor input, keeping the order of the social links
fn parse_profile(
    request: UpdateProfileRequest,
) -> Result<(String, String, Vec<SocialLink>), DomainError> {
    let bio = request.bio.trim().to_string();
    check_max_chars("bio", &bio, BIO_MAX_LENGTH)?;

    let avatar = request.avatar.trim().to_string();
    if !avatar.is_empty() {
        check_url("avatar", &avatar)?;
    }

    let social_links = request
        .social_links
        .into_iter()
        .map(|input| {
            if input.platform.trim().is_empty() {
                return Err(DomainError::ValidationError("platform is required".to_string()));
            }
            let platform = SocialPlatform::parse(&input.platform)?;
            let url = input.url.trim();
            check_url("social link url", url)?;
            Ok(SocialLink::new(platform, url))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((bio, avatar, social_links))
}

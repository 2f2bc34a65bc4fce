//! Authentication service
//!
//! Handles registration, password and Google sign-in, token refresh, and
//! logout. Refresh sessions are keyed by the `sid` claim of the token pair.

use onelink_common::{check_new_password, hash_password, verify_password, AppError, TokenPair};
use onelink_core::{
    normalize_handle, validate_username, Account, DomainError, Snowflake, User,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::clients::VerifiedIdentity;
use crate::dto::{
    AuthResponse, GoogleLoginRequest, LoginRequest, LogoutRequest, RefreshTokenRequest,
    RegisterRequest, UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::validation::check_email;

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register an account together with its profile.
    ///
    /// Input checks run before any storage access and stop at the first
    /// failure: handle, password confirmation and length, then email.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        validate_username(&request.username)?;
        check_new_password(&request.password, &request.confirm_password)?;
        check_email(&request.email)?;

        self.create_account(&request).await.map_err(|e| match e.as_domain() {
            Some(d) if d.is_validation() || d.is_conflict() => e,
            Some(d) if d.is_infrastructure() => {
                warn!(error = %e, "Registration failed: storage unreachable");
                ServiceError::NetworkRequestFailed
            }
            _ => {
                error!(error = %e, "Registration failed");
                ServiceError::RegistrationFailed
            }
        })
    }

    async fn create_account(&self, request: &RegisterRequest) -> ServiceResult<AuthResponse> {
        let username = normalize_handle(&request.username);
        if self.ctx.user_repo().username_exists(&username).await? {
            return Err(DomainError::UsernameTaken(username).into());
        }
        if self.ctx.account_repo().email_exists(&request.email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = hash_password(&request.password)?;

        let id = self.ctx.generate_id();
        let account = Account::new(id, &request.email, request.username.trim());
        let user = User::new(id, &username, account.email.clone());

        // The unique indexes still decide a race between two registrations
        self.ctx
            .account_repo()
            .create(&account, Some(&password_hash), Some(&user))
            .await?;

        info!(user_id = %id, "Account registered");

        let tokens = self.issue_tokens(id).await?;
        Ok(auth_response(tokens, Some(&user)))
    }

    /// Sign in with email and password
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        self.password_login(&request).await.map_err(|e| match e.as_domain() {
            Some(DomainError::InvalidCredentials) => e,
            Some(d) if d.is_validation() => e,
            _ => {
                error!(error = %e, "Login failed");
                ServiceError::LoginFailed
            }
        })
    }

    async fn password_login(&self, request: &LoginRequest) -> ServiceResult<AuthResponse> {
        let account = self
            .ctx
            .account_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email");
                DomainError::InvalidCredentials
            })?;

        // Google-only accounts have no password to check
        let password_hash = self
            .ctx
            .account_repo()
            .get_password_hash(account.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %account.id, "Login failed: no password set");
                DomainError::InvalidCredentials
            })?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(user_id = %account.id, "Login failed: invalid password");
            return Err(DomainError::InvalidCredentials.into());
        }

        info!(user_id = %account.id, "Signed in");
        self.sign_in(account.id).await
    }

    /// Sign in with a Google ID token, creating a federated account on first use
    #[instrument(skip(self, request))]
    pub async fn google_login(&self, request: GoogleLoginRequest) -> ServiceResult<AuthResponse> {
        let verifier = self
            .ctx
            .identity_verifier()
            .ok_or(ServiceError::FederatedLoginUnavailable)?;

        let identity = verifier.verify(&request.id_token).await.map_err(|e| {
            warn!(error = %e, "Google ID token rejected");
            ServiceError::FederatedLoginFailed(e.to_string())
        })?;

        self.federated_sign_in(identity).await.map_err(|e| {
            error!(error = %e, "Google sign-in failed");
            ServiceError::FederatedLoginFailed("could not complete sign-in".to_string())
        })
    }

    async fn federated_sign_in(&self, identity: VerifiedIdentity) -> ServiceResult<AuthResponse> {
        let accounts = self.ctx.account_repo();

        let account_id = if let Some(account) =
            accounts.find_by_google_subject(&identity.subject).await?
        {
            account.id
        } else if let Some(account) = accounts.find_by_email(&identity.email).await? {
            accounts
                .link_google_subject(account.id, &identity.subject)
                .await?;
            info!(user_id = %account.id, "Linked Google identity to existing account");
            account.id
        } else {
            let account = Account::federated(
                self.ctx.generate_id(),
                identity.email,
                identity.subject,
                identity.name,
            );
            accounts.create(&account, None, None).await?;
            info!(user_id = %account.id, "Federated account created");
            account.id
        };

        self.sign_in(account_id).await
    }

    /// Rotate a refresh token: the presented session is revoked and a new
    /// pair is issued.
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let user_id = claims.user_id()?;

        let owner = self.ctx.session_store().validate(&claims.sid).await?;
        if owner != Some(user_id) {
            warn!(user_id = %user_id, "Refresh with revoked or unknown session");
            return Err(AppError::InvalidToken.into());
        }

        self.ctx.session_store().revoke(&claims.sid).await?;
        self.sign_in(user_id).await
    }

    /// Revoke the session behind a refresh token
    #[instrument(skip(self, request))]
    pub async fn logout(&self, request: LogoutRequest) -> ServiceResult<()> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;

        let removed = self.ctx.session_store().revoke(&claims.sid).await?;
        info!(user_id = %claims.sub, removed, "Logged out");
        Ok(())
    }

    /// Revoke every session of a user
    #[instrument(skip(self))]
    pub async fn logout_all(&self, user_id: Snowflake) -> ServiceResult<u32> {
        let removed = self.ctx.session_store().revoke_all_for_user(user_id).await?;
        info!(user_id = %user_id, removed, "Logged out everywhere");
        Ok(removed)
    }

    async fn sign_in(&self, user_id: Snowflake) -> ServiceResult<AuthResponse> {
        let user = self.ctx.user_repo().find_by_id(user_id).await?;
        let tokens = self.issue_tokens(user_id).await?;
        Ok(auth_response(tokens, user.as_ref()))
    }

    async fn issue_tokens(&self, user_id: Snowflake) -> ServiceResult<TokenPair> {
        let session_id = Uuid::new_v4().to_string();
        let tokens = self.ctx.jwt_service().issue(user_id, &session_id)?;
        self.ctx.session_store().store(&session_id, user_id).await?;
        Ok(tokens)
    }
}

fn auth_response(tokens: TokenPair, user: Option<&User>) -> AuthResponse {
    AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: tokens.token_type,
        expires_in: tokens.expires_in,
        needs_handle: user.is_none(),
        user: user.map(UserResponse::from),
    }
}

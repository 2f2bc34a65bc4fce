//! Service context - dependency container for services
//!
//! Holds every port the use cases need. Infrastructure is injected as trait
//! objects, so the API binary wires Postgres and Redis while tests wire
//! in-memory fakes.

use std::sync::Arc;

use onelink_common::JwtService;
use onelink_core::{
    AccountRepository, LinkEvent, LinkEventPublisher, LinkRepository, SessionStore, Snowflake,
    SnowflakeGenerator, UserRepository,
};
use tracing::warn;

use crate::clients::{DiscordClient, IdentityVerifier};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    account_repo: Arc<dyn AccountRepository>,
    user_repo: Arc<dyn UserRepository>,
    link_repo: Arc<dyn LinkRepository>,

    // Sessions and the link feed
    session_store: Arc<dyn SessionStore>,
    publisher: Arc<dyn LinkEventPublisher>,

    // Outbound clients
    discord: Arc<dyn DiscordClient>,
    identity_verifier: Option<Arc<dyn IdentityVerifier>>,

    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn account_repo(&self) -> &dyn AccountRepository {
        self.account_repo.as_ref()
    }

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn link_repo(&self) -> &dyn LinkRepository {
        self.link_repo.as_ref()
    }

    /// Shared handle to the link repository, for long-lived consumers
    pub fn link_repo_arc(&self) -> Arc<dyn LinkRepository> {
        Arc::clone(&self.link_repo)
    }

    // === Sessions / Pub/Sub ===

    pub fn session_store(&self) -> &dyn SessionStore {
        self.session_store.as_ref()
    }

    /// Publish a link change to the owner's feed.
    ///
    /// The mutation has already been committed, so a failed publish is
    /// logged and swallowed.
    pub async fn publish_link_event(&self, event: LinkEvent) {
        match self.publisher.publish(&event).await {
            Ok(receivers) => {
                tracing::debug!(
                    event = event.event_type(),
                    link_id = %event.link_id,
                    receivers,
                    "Published link event"
                );
            }
            Err(e) => {
                warn!(
                    event = event.event_type(),
                    link_id = %event.link_id,
                    error = %e,
                    "Failed to publish link event"
                );
            }
        }
    }

    // === Clients ===

    pub fn discord(&self) -> &dyn DiscordClient {
        self.discord.as_ref()
    }

    /// None when Google sign-in is not configured
    pub fn identity_verifier(&self) -> Option<&dyn IdentityVerifier> {
        self.identity_verifier.as_deref()
    }

    // === Services ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("google_sign_in", &self.identity_verifier.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    account_repo: Option<Arc<dyn AccountRepository>>,
    user_repo: Option<Arc<dyn UserRepository>>,
    link_repo: Option<Arc<dyn LinkRepository>>,
    session_store: Option<Arc<dyn SessionStore>>,
    publisher: Option<Arc<dyn LinkEventPublisher>>,
    discord: Option<Arc<dyn DiscordClient>>,
    identity_verifier: Option<Arc<dyn IdentityVerifier>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
    value.ok_or_else(|| ServiceError::internal(format!("{name} is required")))
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_repo(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.account_repo = Some(repo);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn link_repo(mut self, repo: Arc<dyn LinkRepository>) -> Self {
        self.link_repo = Some(repo);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn LinkEventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn discord(mut self, client: Arc<dyn DiscordClient>) -> Self {
        self.discord = Some(client);
        self
    }

    /// Optional; Google sign-in reports unavailable without it
    pub fn identity_verifier(mut self, verifier: Option<Arc<dyn IdentityVerifier>>) -> Self {
        self.identity_verifier = verifier;
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            account_repo: required(self.account_repo, "account_repo")?,
            user_repo: required(self.user_repo, "user_repo")?,
            link_repo: required(self.link_repo, "link_repo")?,
            session_store: required(self.session_store, "session_store")?,
            publisher: required(self.publisher, "publisher")?,
            discord: required(self.discord, "discord")?,
            identity_verifier: self.identity_verifier,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            snowflake_generator: required(self.snowflake_generator, "snowflake_generator")?,
        })
    }
}

//! In-memory implementations of every port, for service tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use onelink_common::JwtService;
use onelink_core::{
    sort_newest_first, Account, AccountRepository, DiscordProfile, DomainError, Link, LinkEvent,
    LinkEventPublisher, LinkRepository, LinkType, RepoResult, SessionStore, Snowflake,
    SnowflakeGenerator, User, UserRepository,
};
use parking_lot::Mutex;

use crate::clients::{DiscordClient, DiscordError, IdentityError, IdentityVerifier, VerifiedIdentity};

use super::context::ServiceContext;

#[derive(Default)]
struct Tables {
    accounts: HashMap<Snowflake, (Account, Option<String>)>,
    users: HashMap<Snowflake, User>,
    links: HashMap<Snowflake, Link>,
}

/// Postgres stand-in sharing one lock, so account+profile creation is atomic
#[derive(Default)]
pub struct MemoryDb {
    tables: Mutex<Tables>,
    /// When set, every call fails like an unreachable database
    pub offline: AtomicBool,
    /// Link types passed to `find_by_owner_and_type`, in call order
    pub typed_link_queries: Mutex<Vec<LinkType>>,
}

impl MemoryDb {
    fn check(&self) -> RepoResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("connection refused".to_string()));
        }
        Ok(())
    }

    pub fn account_count(&self) -> usize {
        self.tables.lock().accounts.len()
    }

    pub fn insert_link(&self, link: Link) {
        self.tables.lock().links.insert(link.id, link);
    }
}

#[async_trait]
impl AccountRepository for MemoryDb {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Account>> {
        self.check()?;
        Ok(self.tables.lock().accounts.get(&id).map(|(a, _)| a.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        self.check()?;
        let email = email.trim().to_lowercase();
        Ok(self
            .tables
            .lock()
            .accounts
            .values()
            .find(|(a, _)| a.email == email)
            .map(|(a, _)| a.clone()))
    }

    async fn find_by_google_subject(&self, subject: &str) -> RepoResult<Option<Account>> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .accounts
            .values()
            .find(|(a, _)| a.google_subject.as_deref() == Some(subject))
            .map(|(a, _)| a.clone()))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(AccountRepository::find_by_email(self, email).await?.is_some())
    }

    async fn create(
        &self,
        account: &Account,
        password_hash: Option<&str>,
        profile: Option<&User>,
    ) -> RepoResult<()> {
        self.check()?;
        let mut tables = self.tables.lock();
        if tables.accounts.values().any(|(a, _)| a.email == account.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        if let Some(user) = profile {
            if tables.users.values().any(|u| u.username == user.username) {
                return Err(DomainError::UsernameTaken(user.username.clone()));
            }
            tables.users.insert(user.id, user.clone());
        }
        tables
            .accounts
            .insert(account.id, (account.clone(), password_hash.map(str::to_string)));
        Ok(())
    }

    async fn link_google_subject(&self, id: Snowflake, subject: &str) -> RepoResult<()> {
        self.check()?;
        let mut tables = self.tables.lock();
        let (account, _) = tables
            .accounts
            .get_mut(&id)
            .ok_or(DomainError::AccountNotFound(id))?;
        account.google_subject = Some(subject.to_string());
        Ok(())
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        self.check()?;
        self.tables
            .lock()
            .accounts
            .get(&id)
            .map(|(_, hash)| hash.clone())
            .ok_or(DomainError::AccountNotFound(id))
    }
}

#[async_trait]
impl UserRepository for MemoryDb {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        self.check()?;
        Ok(self.tables.lock().users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn create(&self, user: &User) -> RepoResult<()> {
        self.check()?;
        let mut tables = self.tables.lock();
        if tables.users.contains_key(&user.id) {
            return Err(DomainError::ProfileAlreadyExists);
        }
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(DomainError::UsernameTaken(user.username.clone()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_profile(&self, user: &User) -> RepoResult<()> {
        self.check()?;
        let mut tables = self.tables.lock();
        let stored = tables
            .users
            .get_mut(&user.id)
            .ok_or_else(|| DomainError::ProfileNotFound(user.id.to_string()))?;
        stored.bio.clone_from(&user.bio);
        stored.avatar.clone_from(&user.avatar);
        stored.social_links.clone_from(&user.social_links);
        stored.updated_at = user.updated_at;
        Ok(())
    }
}

#[async_trait]
impl LinkRepository for MemoryDb {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Link>> {
        self.check()?;
        Ok(self.tables.lock().links.get(&id).cloned())
    }

    async fn find_by_owner(&self, user_id: Snowflake) -> RepoResult<Vec<Link>> {
        self.check()?;
        let mut links: Vec<Link> = self
            .tables
            .lock()
            .links
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        sort_newest_first(&mut links);
        Ok(links)
    }

    async fn find_by_owner_and_type(
        &self,
        user_id: Snowflake,
        link_type: LinkType,
    ) -> RepoResult<Vec<Link>> {
        self.typed_link_queries.lock().push(link_type);
        let mut links = self.find_by_owner(user_id).await?;
        links.retain(|l| l.link_type == link_type);
        Ok(links)
    }

    async fn create(&self, link: &Link) -> RepoResult<()> {
        self.check()?;
        self.tables.lock().links.insert(link.id, link.clone());
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        self.check()?;
        Ok(self.tables.lock().links.remove(&id).is_some())
    }

    async fn increment_clicks(&self, id: Snowflake) -> RepoResult<Option<Link>> {
        self.check()?;
        let mut tables = self.tables.lock();
        Ok(tables.links.get_mut(&id).map(|link| {
            link.clicks += 1;
            link.clone()
        }))
    }
}

#[derive(Default)]
pub struct MemorySessions {
    tokens: Mutex<HashMap<String, Snowflake>>,
}

impl MemorySessions {
    pub fn len(&self) -> usize {
        self.tokens.lock().len()
    }
}

#[async_trait]
impl SessionStore for MemorySessions {
    async fn store(&self, token_id: &str, user_id: Snowflake) -> RepoResult<()> {
        self.tokens.lock().insert(token_id.to_string(), user_id);
        Ok(())
    }

    async fn validate(&self, token_id: &str) -> RepoResult<Option<Snowflake>> {
        Ok(self.tokens.lock().get(token_id).copied())
    }

    async fn revoke(&self, token_id: &str) -> RepoResult<bool> {
        Ok(self.tokens.lock().remove(token_id).is_some())
    }

    async fn revoke_all_for_user(&self, user_id: Snowflake) -> RepoResult<u32> {
        let mut tokens = self.tokens.lock();
        let before = tokens.len();
        tokens.retain(|_, owner| *owner != user_id);
        Ok(u32::try_from(before - tokens.len()).unwrap_or(u32::MAX))
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<LinkEvent>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl LinkEventPublisher for RecordingPublisher {
    async fn publish(&self, event: &LinkEvent) -> RepoResult<usize> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::CacheError("redis down".to_string()));
        }
        self.events.lock().push(event.clone());
        Ok(1)
    }
}

/// Answers with a fixed profile and counts calls
#[derive(Default)]
pub struct FakeDiscord {
    pub profile: Mutex<Option<DiscordProfile>>,
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl DiscordClient for FakeDiscord {
    async fn fetch_user(&self, discord_id: &str) -> Result<DiscordProfile, DiscordError> {
        self.calls.lock().push(discord_id.to_string());
        self.profile
            .lock()
            .clone()
            .ok_or_else(|| DiscordError::UnknownUser(discord_id.to_string()))
    }
}

/// Accepts `valid:<subject>:<email>` tokens
#[derive(Default)]
pub struct FakeIdentity {
    pub calls: AtomicUsize,
}

#[async_trait]
impl IdentityVerifier for FakeIdentity {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut parts = id_token.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("valid"), Some(subject), Some(email)) => Ok(VerifiedIdentity {
                subject: subject.to_string(),
                email: email.to_string(),
                name: Some("Google User".to_string()),
            }),
            _ => Err(IdentityError::Rejected),
        }
    }
}

pub struct Fakes {
    pub db: Arc<MemoryDb>,
    pub sessions: Arc<MemorySessions>,
    pub publisher: Arc<RecordingPublisher>,
    pub discord: Arc<FakeDiscord>,
    pub identity: Arc<FakeIdentity>,
}

impl Fakes {
    pub fn events(&self) -> Vec<LinkEvent> {
        self.publisher.events.lock().clone()
    }

    pub fn set_offline(&self, offline: bool) {
        self.db.offline.store(offline, Ordering::SeqCst);
    }
}

fn build(with_google: bool) -> (ServiceContext, Fakes) {
    let fakes = Fakes {
        db: Arc::new(MemoryDb::default()),
        sessions: Arc::new(MemorySessions::default()),
        publisher: Arc::new(RecordingPublisher::default()),
        discord: Arc::new(FakeDiscord::default()),
        identity: Arc::new(FakeIdentity::default()),
    };

    let identity: Option<Arc<dyn IdentityVerifier>> = if with_google {
        Some(fakes.identity.clone())
    } else {
        None
    };

    let ctx = ServiceContext::builder()
        .account_repo(fakes.db.clone())
        .user_repo(fakes.db.clone())
        .link_repo(fakes.db.clone())
        .session_store(fakes.sessions.clone())
        .publisher(fakes.publisher.clone())
        .discord(fakes.discord.clone())
        .identity_verifier(identity)
        .jwt_service(Arc::new(JwtService::new("test-secret-key", 900, 604_800)))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
        .build()
        .unwrap();

    (ctx, fakes)
}

pub fn context() -> (ServiceContext, Fakes) {
    build(true)
}

pub fn context_without_google() -> (ServiceContext, Fakes) {
    build(false)
}

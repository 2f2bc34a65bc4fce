//! Server setup and initialization
//!
//! Wires Postgres, Redis and the outbound clients into the service context,
//! then builds and serves the router.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use onelink_cache::{create_shared_pool, Publisher, RedisPoolConfig, RefreshTokenStore};
use onelink_common::{AppConfig, AppError, JwtService};
use onelink_core::SnowflakeGenerator;
use onelink_db::{
    create_pool, run_migrations, PgAccountRepository, PgLinkRepository, PgUserRepository,
};
use onelink_service::{
    GoogleIdentityVerifier, HttpDiscordClient, IdentityVerifier, ServiceContextBuilder,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_rate_limit(create_router(), &config.rate_limit)?;
    let router = apply_middleware(
        api.merge(health_routes()),
        &config.cors,
        config.app.env.is_production(),
    );
    Ok(router.with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = onelink_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if let Some(dir) = &config.database.migrations_dir {
        info!(dir = %dir, "Applying database migrations");
        run_migrations(&pool, dir)
            .await
            .map_err(|e| AppError::Database(format!("migration failed: {e}")))?;
    }

    info!("Connecting to Redis...");
    let redis_pool = create_shared_pool(RedisPoolConfig::from(&config.redis))
        .map_err(|e| AppError::Cache(e.to_string()))?;
    if let Err(e) = redis_pool.health_check().await {
        // Readiness reports it; sign-in fails until Redis is back
        warn!(error = %e, "Redis is not reachable yet");
    } else {
        info!("Redis connection established");
    }

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let discord = HttpDiscordClient::from_config(&config.discord)
        .map_err(|e| AppError::Config(format!("discord client: {e}")))?;
    if !config.discord.is_enabled() {
        info!("DISCORD_BOT_TOKEN not set, public profiles render without Discord data");
    }

    let identity_verifier = GoogleIdentityVerifier::from_config(&config.google)
        .map_err(|e| AppError::Config(format!("google client: {e}")))?
        .map(|v| Arc::new(v) as Arc<dyn IdentityVerifier>);
    if identity_verifier.is_none() {
        info!("GOOGLE_CLIENT_ID not set, Google sign-in is disabled");
    }

    let refresh_ttl = u64::try_from(config.jwt.refresh_token_expiry).unwrap_or_default();

    let service_context = ServiceContextBuilder::new()
        .account_repo(Arc::new(PgAccountRepository::new(pool.clone())))
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .link_repo(Arc::new(PgLinkRepository::new(pool.clone())))
        .session_store(Arc::new(RefreshTokenStore::with_ttl(
            (*redis_pool).clone(),
            refresh_ttl,
        )))
        .publisher(Arc::new(Publisher::new((*redis_pool).clone())))
        .discord(Arc::new(discord))
        .identity_verifier(identity_verifier)
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, pool, redis_pool))
}

/// Serve until the process receives Ctrl+C
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state)?;
    run_server(app, addr).await
}

//! Gateway server setup

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use onelink_cache::SubscriberBuilder;
use onelink_common::{AppConfig, AppError, JwtService};
use onelink_db::{create_pool, PgLinkRepository};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::broadcast::{EventDispatcher, LinkFeeds, SnapshotLoader};
use crate::connection::ConnectionManager;

pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/ws/links", get(gateway_handler))
        .route("/health", get(health_check))
}

#[derive(Debug, Serialize)]
pub struct GatewayHealth {
    pub status: &'static str,
    pub connections: usize,
    pub users: usize,
    pub dispatcher_running: bool,
}

/// GET /health
async fn health_check(State(state): State<GatewayState>) -> Json<GatewayHealth> {
    let manager = state.connection_manager();
    Json(GatewayHealth {
        status: "healthy",
        connections: manager.connection_count(),
        users: manager.user_count(),
        dispatcher_running: state.dispatcher_running(),
    })
}

pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Connect Postgres and Redis, start the event dispatcher and build the state
pub async fn create_gateway_state(config: &AppConfig) -> Result<GatewayState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&onelink_db::DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    let subscriber = SubscriberBuilder::new()
        .redis_url(&config.redis.url)
        .build()
        .await
        .map_err(|e| AppError::Cache(format!("Failed to start subscriber: {e}")))?;

    let connection_manager = ConnectionManager::new_shared();
    let snapshots = Arc::new(SnapshotLoader::new(Arc::new(PgLinkRepository::new(pool))));

    let dispatcher = Arc::new(EventDispatcher::new(
        Arc::clone(&connection_manager),
        Arc::clone(&snapshots),
    ));
    Arc::clone(&dispatcher).start(subscriber.receiver());

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));

    let state = GatewayState::new(
        connection_manager,
        Arc::new(subscriber) as Arc<dyn LinkFeeds>,
        snapshots,
        jwt_service,
        Duration::from_millis(config.gateway.heartbeat_interval_ms),
    );
    Ok(state.with_dispatcher(dispatcher))
}

/// Serve until the process receives Ctrl+C
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Gateway listening on ws://{}/ws/links", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .gateway
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid gateway address: {e}")))?;

    let state = create_gateway_state(&config).await?;
    run_server(create_app(state), addr).await
}

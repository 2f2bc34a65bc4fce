//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! the configuration and the pools the readiness check reads.

use std::sync::Arc;

use onelink_cache::SharedRedisPool;
use onelink_common::{AppConfig, JwtService};
use onelink_db::PgPool;
use onelink_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
    db_pool: PgPool,
    redis_pool: SharedRedisPool,
}

impl AppState {
    pub fn new(
        service_context: ServiceContext,
        config: AppConfig,
        db_pool: PgPool,
        redis_pool: SharedRedisPool,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            db_pool,
            redis_pool,
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn db_pool(&self) -> &PgPool {
        &self.db_pool
    }

    pub fn redis_pool(&self) -> &SharedRedisPool {
        &self.redis_pool
    }

    /// Get the JWT service from the service context
    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("env", &self.config.app.env)
            .finish_non_exhaustive()
    }
}

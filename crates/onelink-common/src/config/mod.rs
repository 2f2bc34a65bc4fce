//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, DiscordConfig, Environment,
    GatewayConfig, GoogleConfig, JwtConfig, RateLimitConfig, RedisConfig, ServerConfig,
    SnowflakeConfig,
};

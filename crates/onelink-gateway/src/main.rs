//! OneLink gateway entry point
//!
//! Run with:
//! ```bash
//! cargo run -p onelink-gateway
//! ```
//!
//! Configuration is read from the environment (and `.env`, if present).

use onelink_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Gateway failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    let tracing_config = TracingConfig::for_environment(config.app.env);
    if let Err(e) = try_init_tracing_with_config(&tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.gateway.address(),
        heartbeat_interval_ms = config.gateway.heartbeat_interval_ms,
        "Starting OneLink gateway"
    );

    onelink_gateway::run(config).await?;
    Ok(())
}

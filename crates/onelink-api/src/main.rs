//! OneLink API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p onelink-api
//! ```
//!
//! Configuration is read from the environment (and `.env`, if present).

use onelink_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "API server failed");
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
        address = %config.api.address(),
        "Starting OneLink API server"
    );

    onelink_api::run(config).await?;
    Ok(())
}

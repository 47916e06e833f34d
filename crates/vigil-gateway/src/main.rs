//! Vigil log bot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p vigil-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use tracing::{error, info};
use vigil_common::{try_init_tracing, AppConfig};

#[tokio::main]
async fn main() {
    // Initialize tracing
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    // Run the bot
    if let Err(e) = run().await {
        error!(error = %e, "Bot failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    info!("Starting vigil log bot...");

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        member_log = %config.channels.member_log_id,
        message_log = %config.channels.message_log_id,
        "Configuration loaded"
    );

    // Run until the gateway connection ends
    vigil_gateway::run(config).await?;

    Ok(())
}

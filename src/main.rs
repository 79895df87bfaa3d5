//! tablegate binary
//!
//! Loads `.env` from the working directory, then serves the gateway on
//! port 9413 (or `LISTEN_ADDR`). Exits with an error if the environment
//! file cannot be loaded or the listener cannot bind.

use anyhow::{Context, Result};
use tablegate::config::{DEFAULT_ENV_FILE, GatewayConfig};
use tablegate::server::GatewayServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = GatewayConfig::load(DEFAULT_ENV_FILE).context("Loading .env")?;

    tracing::info!(
        "Starting tablegate v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.listen_addr
    );

    GatewayServer::new(config).serve().await
}

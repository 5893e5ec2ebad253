//! Homio server
//!
//! Boots the runtime, sets up the Homio Dashboard integration, and serves
//! the registered static assets over HTTP until interrupted.

use anyhow::{Context, Result};
use homio_dashboard::{HomioDashboard, DOMAIN};
use homio_runtime::{ConfigEntry, Homio};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config_dir = env::var("HOMIO_CONFIG_DIR").unwrap_or_else(|_| "./config".to_string());
    let bind = env::var("HOMIO_BIND").unwrap_or_else(|_| "127.0.0.1:8123".to_string());

    info!(config_dir = %config_dir, "Starting Homio");

    let homio = Homio::new(&config_dir);
    let mut entry = ConfigEntry::new(DOMAIN, "Homio Dashboard");
    let mut integration = HomioDashboard::new();

    integration
        .setup(&homio, &mut entry)
        .await
        .context("Homio Dashboard setup failed")?;

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    info!(addr = %bind, "Serving Homio assets");

    axum::serve(listener, homio.router())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("HTTP server error")?;

    info!("Shutting down");
    integration.unload(&homio, &mut entry).await?;
    Ok(())
}

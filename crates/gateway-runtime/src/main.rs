//! HerbTrace gateway entry point.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gateway_runtime::{bootstrap, http, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RuntimeConfig::from_env();
    info!("===========================================");
    info!("  HerbTrace Gateway v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "  Network: {} / {} / {}",
        config.profile.network_name, config.profile.channel, config.profile.chaincode
    );
    info!("===========================================");

    let gateway = bootstrap(&config).await?;

    let addr = config.http_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, "HTTP surface listening");

    axum::serve(listener, http::router(gateway))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

//! fanchat-gateway server entry point.
//!
//! Loads configuration, wires the provider and relay, and serves HTTP and
//! WebSocket traffic on a single-threaded runtime.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use fanchat_gateway::app_state::AppState;
use fanchat_gateway::config::{GatewayConfig, LogFormat};
use fanchat_gateway::provider::OpenRouterProvider;
use fanchat_gateway::server;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(
        addr = %config.listen_addr,
        production = config.environment.is_production(),
        origins = config.allowed_origins.len(),
        "starting fanchat-gateway"
    );

    // Build provider and application state
    let provider = OpenRouterProvider::new(&config.provider).context("building provider client")?;
    tracing::info!(model = provider.model(), "completions provider ready");
    let state = AppState::new(&config, Arc::new(provider));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    server::serve(listener, state, server::shutdown_signal()).await?;

    Ok(())
}

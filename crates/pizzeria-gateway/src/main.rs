//! Pizzeria gateway binary.
//!
//! - WebSocket endpoint: /v1/ws (one connection = one session scope)
//! - Metrics: /metrics
//! - Config path from `PIZZERIA_CONFIG` (default `pizzeria.yaml`)

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use pizzeria_gateway::{app_state, config, router};

const DEFAULT_CONFIG_PATH: &str = "pizzeria.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path =
        std::env::var("PIZZERIA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .map_err(|e| format!("gateway.listen must be a valid SocketAddr: {e}"))?;

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state.clone());

    tracing::info!(%listen, config = %path, "pizzeria-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    tracing::info!("pizzeria-gateway stopped");
    Ok(())
}

async fn shutdown_signal(state: app_state::AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    state.metrics().set_draining();
    tracing::info!(active = state.scopes().active_count(), "shutdown requested; draining");
}

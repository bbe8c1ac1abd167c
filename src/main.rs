//! Multi Countdown - A state-managed HTTP host for independent countdown timers
//! 
//! This is the main entry point for the multi-countdown application.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use multi_countdown::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::display_log_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("multi_countdown={},tower_http=info", config.log_level()))
        .init();

    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;

    info!("Starting multi-countdown server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, timers={}, default duration={}s",
          config.host, config.port, config.timers, config.default_duration.trim());

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.timers,
        &config.default_duration,
    ));

    // Render display updates into the log
    let updates = state.subscribe();
    tokio::spawn(async move {
        display_log_task(updates).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timers           - Snapshot of every timer");
    info!("  GET  /timers/:id       - Snapshot of one timer");
    info!("  PUT  /timers/:id/input - Edit the duration input");
    info!("  POST /timers/:id/start - Start or resume a timer");
    info!("  POST /timers/:id/pause - Pause a running timer");
    info!("  POST /timers/:id/reset - Reset a timer");
    info!("  GET  /events           - Stream display updates (SSE)");
    info!("  GET  /status           - Host status and all timers");
    info!("  GET  /health           - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            result.context("Failed to install signal handler")?;
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

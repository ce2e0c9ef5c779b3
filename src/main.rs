//! Interval Timer - A work/rest interval timer daemon
//! 
//! This is the main entry point for the interval-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use interval_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::terminal_display_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("interval_timer={},tower_http=info", config.log_level()))
        .init();

    let timer_config = config.timer_config();
    info!("Starting interval-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, loops={}, work={}s, rest={}s",
          config.host, config.port, timer_config.total_loops,
          timer_config.work_seconds, timer_config.rest_seconds);

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        timer_config,
        config.labels(),
        config.cue_player(),
    ));

    // Load cue sounds in the background; the timer works without them
    state.preload_audio();

    if let Some(format) = config.display {
        let display_rx = state.display_tx.subscribe();
        tokio::spawn(async move {
            terminal_display_task(display_rx, format).await;
        });
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start  - Start the sequence (stops it if running)");
    info!("  POST /stop   - Stop and reset the sequence");
    info!("  POST /pause  - Pause or resume the sequence");
    info!("  GET  /config - Current loops, work and rest settings");
    info!("  PUT  /config - Change settings while idle");
    info!("  GET  /status - Display state and server status");
    info!("  GET  /health - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}

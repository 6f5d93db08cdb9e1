//! Multitimer - A state-managed HTTP server for a multi-mode timer
//!
//! This is the main entry point for the multitimer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use multitimer::{
    config::Config,
    engine::TimerEngine,
    state::AppState,
    api::create_router,
    tasks::tick_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("multitimer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting multitimer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms",
          config.host, config.port, config.tick_interval);

    // Create application state around a freshly configured engine
    let engine = TimerEngine::new(config.pomodoro());
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.tick_interval,
        engine,
    ));

    // Start the periodic tick background task
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        tick_task(tick_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start       - Start or resume the timer");
    info!("  POST /pause       - Pause the timer");
    info!("  POST /reset       - Reset the timer");
    info!("  POST /lap         - Record a lap (running stopwatch only)");
    info!("  POST /mode/:mode  - Switch mode (stopwatch|countdown|pomodoro)");
    info!("  POST /countdown   - Set the countdown duration");
    info!("  POST /pomodoro    - Set Pomodoro durations");
    info!("  GET  /status      - Current timer snapshot and server metadata");
    info!("  GET  /health      - Health check");

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

    info!("Server shutdown complete");
    Ok(())
}

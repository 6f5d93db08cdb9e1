//! Signal handling for graceful shutdown

use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tracing::info;

const SHUTDOWN_SIGNALS: &[i32] = &[
    signal_hook::consts::SIGTERM,
    signal_hook::consts::SIGINT,
];

/// Resolve once a shutdown signal (SIGTERM or SIGINT) arrives
pub async fn shutdown_signal() {
    let mut signals = match Signals::new(SHUTDOWN_SIGNALS) {
        Ok(signals) => signals,
        Err(e) => {
            tracing::error!("Failed to register signal handler: {}", e);
            // Fall back to never resolving; the server keeps running
            futures::future::pending::<()>().await;
            return;
        }
    };

    if let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
    }
}

//! Periodic tick background task

use std::{sync::Arc, time::Duration};
use tracing::{error, info, warn};

use crate::{engine::TimerEvent, state::AppState, utils::notify};

/// Background task that owns the single periodic tick source.
///
/// The engine's `tick()` is a no-op while the timer is stopped, so one
/// long-lived task is enough: `start()` never needs to register a second
/// tick source and `pause()`/`reset()` need no cancellation handshake.
pub async fn tick_task(state: Arc<AppState>) {
    info!("Starting tick task with {}ms interval", state.tick_interval_ms);

    let mut interval = tokio::time::interval(Duration::from_millis(state.tick_interval_ms.max(1)));

    loop {
        interval.tick().await;

        // Hold the lock only for the tick itself
        let (event, snapshot) = {
            let mut engine = match state.engine.lock() {
                Ok(engine) => engine,
                Err(e) => {
                    error!("Failed to lock timer engine: {}", e);
                    continue;
                }
            };
            let event = engine.tick();
            let active = engine.is_running() || event.is_some();
            (event, active.then(|| engine.snapshot()))
        };

        if let Some(snapshot) = snapshot {
            if let Err(e) = state.snapshot_tx.send(snapshot) {
                warn!("Failed to send snapshot update: {}", e);
            }
        }

        if let Some(event) = event {
            match &event {
                TimerEvent::Finished => info!("Countdown finished"),
                TimerEvent::PhaseChanged { phase, session } => {
                    info!("Pomodoro phase changed to {} (session {})", phase, session);
                }
            }
            state.publish_event(event.clone());
            // The notification call talks to a D-Bus daemon and can block;
            // keep it off the tick loop
            tokio::task::spawn_blocking(move || notify::send_event_notification(&event));
        }
    }
}

//! Main application state management

use std::{
    sync::Mutex,
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::warn;

use crate::engine::{TimerEngine, TimerEvent, TimerSnapshot};

/// Shared application state: the timer engine plus its notification channels
#[derive(Debug)]
pub struct AppState {
    /// The timer engine; every operation goes through this lock
    pub engine: Mutex<TimerEngine>,
    /// Tick interval for the background task, in milliseconds
    pub tick_interval_ms: u64,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for boundary events (countdown finished, phase changed)
    pub event_tx: broadcast::Sender<TimerEvent>,
    /// Channel for timer snapshot updates
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create a new AppState around a freshly configured engine
    pub fn new(port: u16, host: String, tick_interval_ms: u64, engine: TimerEngine) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

        Self {
            engine: Mutex::new(engine),
            tick_interval_ms,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            event_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Apply an operation to the engine, record it as the last action, and
    /// publish the resulting snapshot to watchers
    pub fn with_engine<F, R>(&self, action: &str, operation: F) -> Result<(R, TimerSnapshot), String>
    where
        F: FnOnce(&mut TimerEngine) -> R,
    {
        // Lock the engine and apply the operation
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

        let result = operation(&mut engine);
        let snapshot = engine.snapshot();
        drop(engine); // Release the lock early

        // Update last action tracking
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        // Notify snapshot watchers
        if let Err(e) = self.snapshot_tx.send(snapshot.clone()) {
            warn!("Failed to send snapshot update: {}", e);
        }

        Ok((result, snapshot))
    }

    /// Get the current timer snapshot
    pub fn get_snapshot(&self) -> Result<TimerSnapshot, String> {
        self.engine.lock()
            .map(|engine| engine.snapshot())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    /// Publish a boundary event to subscribers
    pub fn publish_event(&self, event: TimerEvent) {
        // No subscribers is not an error; the tick task always publishes
        if self.event_tx.receiver_count() > 0 {
            if let Err(e) = self.event_tx.send(event) {
                warn!("Failed to send timer event: {}", e);
            }
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

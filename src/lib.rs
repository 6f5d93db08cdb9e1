//! Multitimer - A state-managed HTTP server for a multi-mode timer
//!
//! This library provides a stopwatch / countdown / Pomodoro timer engine
//! with an injected monotonic clock, plus the HTTP surface and background
//! tick task that host it.

pub mod config;
pub mod engine;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use engine::{TimerEngine, TimerEvent, TimerMode};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;

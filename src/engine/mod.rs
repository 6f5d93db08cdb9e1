//! Timer engine module
//!
//! This module contains the core timer state machine and its supporting
//! pieces: the injectable clock, duration formatting, and the error type.

pub mod clock;
pub mod error;
pub mod format;
pub mod timer;

// Re-export main types
pub use clock::{Clock, SystemClock};
pub use error::EngineError;
pub use format::format_duration;
pub use timer::{
    PomodoroConfig, PomodoroPhase, TimerEngine, TimerEvent, TimerMode, TimerSnapshot,
};

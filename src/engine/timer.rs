//! Multi-mode timer state machine
//!
//! `TimerEngine` tracks elapsed time across three modes (stopwatch, countdown,
//! Pomodoro) and answers a periodic `tick()` by detecting boundary events:
//! countdown completion and Pomodoro phase changes. It owns its state
//! exclusively and does no I/O; the hosting server drives the tick and renders
//! the snapshots it produces.

use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use super::error::EngineError;
use super::format::format_duration;

/// Timer operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Stopwatch,
    Countdown,
    Pomodoro,
}

impl FromStr for TimerMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "stopwatch" => Ok(TimerMode::Stopwatch),
            "countdown" => Ok(TimerMode::Countdown),
            "pomodoro" => Ok(TimerMode::Pomodoro),
            other => Err(format!("unknown timer mode: {}", other)),
        }
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TimerMode::Stopwatch => "stopwatch",
            TimerMode::Countdown => "countdown",
            TimerMode::Pomodoro => "pomodoro",
        };
        write!(f, "{}", label)
    }
}

/// Pomodoro phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroPhase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl std::fmt::Display for PomodoroPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PomodoroPhase::Focus => "Focus",
            PomodoroPhase::ShortBreak => "Short break",
            PomodoroPhase::LongBreak => "Long break",
        };
        write!(f, "{}", label)
    }
}

/// Pomodoro durations and cycle length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PomodoroConfig {
    pub focus: Duration,
    pub short_break: Duration,
    pub long_break: Duration,
    pub sessions_before_long_break: u32,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            focus: Duration::from_secs(25 * 60),
            short_break: Duration::from_secs(5 * 60),
            long_break: Duration::from_secs(15 * 60),
            sessions_before_long_break: 4,
        }
    }
}

impl PomodoroConfig {
    /// Build a config from minute values; zero, missing, or out-of-range
    /// fields fall back to the defaults (25/5/15 minutes, 4 sessions)
    pub fn from_minutes(focus_min: u64, short_min: u64, long_min: u64, sessions: u32) -> Self {
        let defaults = Self::default();
        Self {
            focus: minutes_or(focus_min, defaults.focus),
            short_break: minutes_or(short_min, defaults.short_break),
            long_break: minutes_or(long_min, defaults.long_break),
            sessions_before_long_break: if sessions == 0 {
                defaults.sessions_before_long_break
            } else {
                sessions
            },
        }
    }

    /// Duration governing the given phase
    pub fn duration_for(&self, phase: PomodoroPhase) -> Duration {
        match phase {
            PomodoroPhase::Focus => self.focus,
            PomodoroPhase::ShortBreak => self.short_break,
            PomodoroPhase::LongBreak => self.long_break,
        }
    }
}

/// Convert a minute count to a duration, falling back to `default` when the
/// value is zero or would overflow the seconds representation
fn minutes_or(minutes: u64, default: Duration) -> Duration {
    match minutes.checked_mul(60) {
        Some(seconds) if seconds > 0 => Duration::from_secs(seconds),
        _ => default,
    }
}

/// Boundary event detected by a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TimerEvent {
    /// Countdown reached zero; the run has stopped
    Finished,
    /// Pomodoro crossed a phase boundary; the timer keeps running
    PhaseChanged { phase: PomodoroPhase, session: u32 },
}

/// Serializable view of the engine for the API and the watch channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub is_running: bool,
    /// Formatted `HH:MM:SS` display value
    pub display: String,
    pub display_ms: u64,
    pub phase: Option<PomodoroPhase>,
    pub session: Option<u32>,
    pub sessions_before_long_break: Option<u32>,
    pub laps: Vec<String>,
}

/// Multi-mode timer state machine with an injected monotonic clock
#[derive(Debug)]
pub struct TimerEngine<C: Clock = SystemClock> {
    clock: C,
    mode: TimerMode,
    is_running: bool,
    /// Epoch of the current run segment, adjusted on resume so that
    /// `now - run_start` is the continuous elapsed time
    run_start: Option<Instant>,
    /// Accumulated elapsed time; authoritative while paused
    elapsed: Duration,
    countdown_target: Duration,
    pomodoro: PomodoroConfig,
    phase: PomodoroPhase,
    session: u32,
    laps: Vec<Duration>,
}

impl TimerEngine<SystemClock> {
    /// Create an engine on the system clock, starting in stopwatch mode
    pub fn new(pomodoro: PomodoroConfig) -> Self {
        Self::with_clock(SystemClock, pomodoro)
    }
}

impl<C: Clock> TimerEngine<C> {
    /// Create an engine with an explicit clock
    pub fn with_clock(clock: C, pomodoro: PomodoroConfig) -> Self {
        Self {
            clock,
            mode: TimerMode::Stopwatch,
            is_running: false,
            run_start: None,
            elapsed: Duration::ZERO,
            countdown_target: Duration::ZERO,
            pomodoro,
            phase: PomodoroPhase::Focus,
            session: 1,
            laps: Vec::new(),
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn phase(&self) -> PomodoroPhase {
        self.phase
    }

    pub fn session(&self) -> u32 {
        self.session
    }

    pub fn laps(&self) -> &[Duration] {
        &self.laps
    }

    /// Switch operating mode, fully resetting all run state
    pub fn set_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.reset();
    }

    /// Begin or resume the run. No-op while already running. Fails when the
    /// required duration for the current mode is not configured.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.is_running {
            return Ok(());
        }

        if self.mode == TimerMode::Countdown && self.countdown_target.is_zero() {
            return Err(EngineError::InvalidDuration(
                "set a countdown time first".to_string(),
            ));
        }
        if self.mode == TimerMode::Pomodoro && self.pomodoro.focus.is_zero() {
            return Err(EngineError::InvalidDuration(
                "set Pomodoro durations first".to_string(),
            ));
        }

        // Shift the epoch back by the accumulated elapsed time so that
        // `now - run_start` stays continuous across pause/resume
        self.is_running = true;
        self.run_start = Some(self.clock.now() - self.elapsed);
        Ok(())
    }

    /// Stop the run, folding the current segment into `elapsed`. No-op while
    /// not running.
    pub fn pause(&mut self) {
        if !self.is_running {
            return;
        }
        if let Some(start) = self.run_start.take() {
            self.elapsed = self.clock.now().saturating_duration_since(start);
        }
        self.is_running = false;
    }

    /// Return to the initial state for the current mode
    pub fn reset(&mut self) {
        self.is_running = false;
        self.run_start = None;
        self.elapsed = Duration::ZERO;
        self.laps.clear();
        self.phase = PomodoroPhase::Focus;
        self.session = 1;
    }

    /// Record the current elapsed time. Valid only in stopwatch mode while
    /// running; silently ignored otherwise.
    pub fn lap(&mut self) {
        if self.mode != TimerMode::Stopwatch || !self.is_running {
            return;
        }
        let elapsed = self.current_elapsed();
        self.laps.push(elapsed);
    }

    /// Configure the countdown duration from hour/minute/second fields
    pub fn set_countdown_target(
        &mut self,
        hours: u64,
        minutes: u64,
        seconds: u64,
    ) -> Result<Duration, EngineError> {
        // Field values come straight from user input; reject anything the
        // seconds representation cannot hold instead of wrapping
        let total_seconds = hours
            .checked_mul(3600)
            .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(seconds))
            .ok_or_else(|| {
                EngineError::InvalidDuration("countdown time is too large".to_string())
            })?;
        let total = Duration::from_secs(total_seconds);
        if total.is_zero() {
            return Err(EngineError::InvalidDuration(
                "countdown time must be greater than zero".to_string(),
            ));
        }
        self.countdown_target = total;
        Ok(total)
    }

    /// Apply Pomodoro durations and restart the session cycle
    pub fn set_pomodoro_config(&mut self, config: PomodoroConfig) {
        self.pomodoro = config;
        self.phase = PomodoroPhase::Focus;
        self.session = 1;
    }

    pub fn pomodoro_config(&self) -> PomodoroConfig {
        self.pomodoro
    }

    /// Advance the clock-derived elapsed time and detect boundary events.
    /// No-op while not running, which also guarantees `Finished` fires at
    /// most once per countdown run.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.is_running {
            return None;
        }
        let now = self.clock.now();
        let start = self.run_start?;
        self.elapsed = now.saturating_duration_since(start);

        match self.mode {
            TimerMode::Stopwatch => None,
            TimerMode::Countdown => {
                if self.elapsed >= self.countdown_target {
                    // Clamp so the display reads exactly zero
                    self.elapsed = self.countdown_target;
                    self.is_running = false;
                    self.run_start = None;
                    Some(TimerEvent::Finished)
                } else {
                    None
                }
            }
            TimerMode::Pomodoro => {
                let phase_duration = self.pomodoro.duration_for(self.phase);
                if self.elapsed >= phase_duration {
                    // Phase switch and elapsed reset happen on the same tick
                    // so no time is lost or double-counted across the boundary
                    let phase = self.advance_phase();
                    self.elapsed = Duration::ZERO;
                    self.run_start = Some(now);
                    Some(TimerEvent::PhaseChanged {
                        phase,
                        session: self.session,
                    })
                } else {
                    None
                }
            }
        }
    }

    fn advance_phase(&mut self) -> PomodoroPhase {
        self.phase = match self.phase {
            PomodoroPhase::Focus => {
                let cycle = self.pomodoro.sessions_before_long_break.max(1);
                if self.session % cycle == 0 {
                    PomodoroPhase::LongBreak
                } else {
                    PomodoroPhase::ShortBreak
                }
            }
            PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak => {
                self.session += 1;
                PomodoroPhase::Focus
            }
        };
        self.phase
    }

    /// Continuous elapsed time of the current run
    pub fn current_elapsed(&self) -> Duration {
        match self.run_start {
            Some(start) if self.is_running => {
                self.clock.now().saturating_duration_since(start)
            }
            _ => self.elapsed,
        }
    }

    /// Duration to display for the current mode: elapsed for stopwatch,
    /// remaining for countdown and Pomodoro
    pub fn display_duration(&self) -> Duration {
        let elapsed = self.current_elapsed();
        match self.mode {
            TimerMode::Stopwatch => elapsed,
            TimerMode::Countdown => self.countdown_target.saturating_sub(elapsed),
            TimerMode::Pomodoro => self
                .pomodoro
                .duration_for(self.phase)
                .saturating_sub(elapsed),
        }
    }

    /// Produce a serializable view of the current state
    pub fn snapshot(&self) -> TimerSnapshot {
        let display = self.display_duration();
        let in_pomodoro = self.mode == TimerMode::Pomodoro;
        TimerSnapshot {
            mode: self.mode,
            is_running: self.is_running,
            display: format_duration(display),
            display_ms: display.as_millis() as u64,
            phase: in_pomodoro.then_some(self.phase),
            session: in_pomodoro.then_some(self.session),
            sessions_before_long_break: in_pomodoro
                .then_some(self.pomodoro.sessions_before_long_break),
            laps: self
                .laps
                .iter()
                .enumerate()
                .map(|(i, lap)| format!("Lap {}: {}", i + 1, format_duration(*lap)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::manual::ManualClock;

    fn engine() -> (TimerEngine<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let engine = TimerEngine::with_clock(clock.clone(), PomodoroConfig::default());
        (engine, clock)
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn elapsed_accumulates_across_pause_and_resume() {
        let (mut engine, clock) = engine();

        engine.start().unwrap();
        clock.advance(ms(1000));
        engine.pause();
        assert_eq!(engine.current_elapsed(), ms(1000));

        // Paused time must not count
        clock.advance(ms(5000));
        assert_eq!(engine.current_elapsed(), ms(1000));

        engine.start().unwrap();
        clock.advance(ms(2500));
        engine.pause();
        assert_eq!(engine.current_elapsed(), ms(3500));
    }

    #[test]
    fn start_while_running_is_a_no_op() {
        let (mut engine, clock) = engine();

        engine.start().unwrap();
        clock.advance(ms(1000));
        engine.start().unwrap();
        clock.advance(ms(1000));
        assert!(engine.tick().is_none());
        assert_eq!(engine.current_elapsed(), ms(2000));
    }

    #[test]
    fn countdown_finishes_exactly_once() {
        let (mut engine, clock) = engine();
        engine.set_mode(TimerMode::Countdown);
        engine.set_countdown_target(0, 0, 5).unwrap();

        engine.start().unwrap();
        clock.advance(ms(6000));
        assert_eq!(engine.tick(), Some(TimerEvent::Finished));
        assert!(!engine.is_running());
        assert_eq!(engine.display_duration(), Duration::ZERO);
        assert_eq!(engine.snapshot().display, "00:00:00");

        // Stopped engine must not fire again
        clock.advance(ms(1000));
        assert_eq!(engine.tick(), None);
    }

    #[test]
    fn countdown_remaining_counts_down() {
        let (mut engine, clock) = engine();
        engine.set_mode(TimerMode::Countdown);
        engine.set_countdown_target(0, 0, 10).unwrap();
        assert_eq!(engine.snapshot().display, "00:00:10");

        engine.start().unwrap();
        clock.advance(ms(3000));
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.display_duration(), ms(7000));
    }

    #[test]
    fn countdown_start_requires_a_target() {
        let (mut engine, _clock) = engine();
        engine.set_mode(TimerMode::Countdown);

        let err = engine.start().unwrap_err();
        assert!(matches!(err, EngineError::InvalidDuration(_)));
        assert!(!engine.is_running());
    }

    #[test]
    fn countdown_target_must_be_positive() {
        let (mut engine, _clock) = engine();
        engine.set_mode(TimerMode::Countdown);

        let err = engine.set_countdown_target(0, 0, 0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDuration(_)));
        assert_eq!(engine.set_countdown_target(1, 1, 1).unwrap(), ms(3_661_000));
    }

    #[test]
    fn countdown_target_overflow_is_rejected() {
        let (mut engine, _clock) = engine();
        engine.set_mode(TimerMode::Countdown);
        engine.set_countdown_target(0, 0, 5).unwrap();

        // Oversized fields must surface as a validation error, not wrap
        let err = engine.set_countdown_target(u64::MAX, 0, 0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDuration(_)));
        let err = engine.set_countdown_target(0, u64::MAX, 0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDuration(_)));
        let err = engine.set_countdown_target(u64::MAX / 3600, u64::MAX / 60, 1).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDuration(_)));

        // Previous valid target stays intact
        assert_eq!(engine.snapshot().display, "00:00:05");
    }

    #[test]
    fn pomodoro_cycles_through_phases_and_sessions() {
        let clock = ManualClock::new();
        let config = PomodoroConfig {
            focus: ms(1),
            short_break: ms(1),
            long_break: ms(1),
            sessions_before_long_break: 2,
        };
        let mut engine = TimerEngine::with_clock(clock.clone(), config);
        engine.set_mode(TimerMode::Pomodoro);
        assert_eq!(engine.phase(), PomodoroPhase::Focus);
        assert_eq!(engine.session(), 1);

        engine.start().unwrap();
        let mut events = Vec::new();
        for _ in 0..4 {
            clock.advance(ms(5));
            if let Some(event) = engine.tick() {
                events.push(event);
            }
        }

        assert_eq!(
            events,
            vec![
                TimerEvent::PhaseChanged {
                    phase: PomodoroPhase::ShortBreak,
                    session: 1
                },
                TimerEvent::PhaseChanged {
                    phase: PomodoroPhase::Focus,
                    session: 2
                },
                TimerEvent::PhaseChanged {
                    phase: PomodoroPhase::LongBreak,
                    session: 2
                },
                TimerEvent::PhaseChanged {
                    phase: PomodoroPhase::Focus,
                    session: 3
                },
            ]
        );
        assert_eq!(engine.session(), 3);
        assert!(engine.is_running());
    }

    #[test]
    fn pomodoro_phase_switch_resets_elapsed_atomically() {
        let clock = ManualClock::new();
        let config = PomodoroConfig {
            focus: ms(1000),
            short_break: ms(1000),
            long_break: ms(1000),
            sessions_before_long_break: 4,
        };
        let mut engine = TimerEngine::with_clock(clock.clone(), config);
        engine.set_mode(TimerMode::Pomodoro);
        engine.start().unwrap();

        // Overshoot the boundary by 200ms; the new phase starts from zero
        clock.advance(ms(1200));
        assert!(matches!(
            engine.tick(),
            Some(TimerEvent::PhaseChanged {
                phase: PomodoroPhase::ShortBreak,
                ..
            })
        ));
        assert_eq!(engine.current_elapsed(), Duration::ZERO);

        clock.advance(ms(300));
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.current_elapsed(), ms(300));
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let (mut engine, clock) = engine();
        engine.start().unwrap();
        clock.advance(ms(2000));
        engine.lap();
        engine.reset();

        assert!(!engine.is_running());
        assert_eq!(engine.current_elapsed(), Duration::ZERO);
        assert!(engine.laps().is_empty());
        assert_eq!(engine.phase(), PomodoroPhase::Focus);
        assert_eq!(engine.session(), 1);
    }

    #[test]
    fn laps_record_in_order_only_in_running_stopwatch() {
        let (mut engine, clock) = engine();
        engine.start().unwrap();
        clock.advance(ms(1000));
        engine.lap();
        clock.advance(ms(1500));
        engine.lap();
        assert_eq!(engine.laps(), &[ms(1000), ms(2500)]);
        assert_eq!(
            engine.snapshot().laps,
            vec!["Lap 1: 00:00:01", "Lap 2: 00:00:02"]
        );

        // Paused stopwatch ignores laps
        engine.pause();
        engine.lap();
        assert_eq!(engine.laps().len(), 2);

        // Countdown mode ignores laps entirely
        engine.set_mode(TimerMode::Countdown);
        engine.set_countdown_target(0, 1, 0).unwrap();
        engine.start().unwrap();
        engine.lap();
        assert!(engine.laps().is_empty());
    }

    #[test]
    fn switching_mode_resets_run_state() {
        let (mut engine, clock) = engine();
        engine.start().unwrap();
        clock.advance(ms(1000));
        engine.lap();

        engine.set_mode(TimerMode::Pomodoro);
        assert!(!engine.is_running());
        assert_eq!(engine.current_elapsed(), Duration::ZERO);
        assert!(engine.laps().is_empty());
        // Pomodoro seeds the display with the focus duration
        assert_eq!(engine.snapshot().display, "00:25:00");
    }

    #[test]
    fn pomodoro_config_zero_fields_fall_back_to_defaults() {
        let config = PomodoroConfig::from_minutes(0, 0, 0, 0);
        assert_eq!(config, PomodoroConfig::default());

        // Minute values too large for the seconds representation are treated
        // like any other invalid input
        let config = PomodoroConfig::from_minutes(u64::MAX, u64::MAX, u64::MAX, 0);
        assert_eq!(config, PomodoroConfig::default());

        let config = PomodoroConfig::from_minutes(50, 10, 0, 3);
        assert_eq!(config.focus, Duration::from_secs(50 * 60));
        assert_eq!(config.short_break, Duration::from_secs(10 * 60));
        assert_eq!(config.long_break, Duration::from_secs(15 * 60));
        assert_eq!(config.sessions_before_long_break, 3);
    }

    #[test]
    fn set_pomodoro_config_restarts_the_cycle() {
        let clock = ManualClock::new();
        let config = PomodoroConfig {
            focus: ms(1),
            short_break: ms(1),
            long_break: ms(1),
            sessions_before_long_break: 2,
        };
        let mut engine = TimerEngine::with_clock(clock.clone(), config);
        engine.set_mode(TimerMode::Pomodoro);
        engine.start().unwrap();
        clock.advance(ms(5));
        engine.tick();
        assert_eq!(engine.phase(), PomodoroPhase::ShortBreak);

        engine.set_pomodoro_config(PomodoroConfig::default());
        assert_eq!(engine.phase(), PomodoroPhase::Focus);
        assert_eq!(engine.session(), 1);
    }
}

//! Configuration and CLI argument handling

use clap::Parser;

use crate::engine::PomodoroConfig;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "multitimer")]
#[command(about = "A state-managed HTTP server for a multi-mode timer")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Tick interval in milliseconds
    #[arg(short, long, default_value = "100")]
    pub tick_interval: u64,

    /// Initial Pomodoro focus duration in minutes
    #[arg(long, default_value = "25")]
    pub focus: u64,

    /// Initial Pomodoro short break duration in minutes
    #[arg(long, default_value = "5")]
    pub short_break: u64,

    /// Initial Pomodoro long break duration in minutes
    #[arg(long, default_value = "15")]
    pub long_break: u64,

    /// Focus sessions before a long break
    #[arg(long, default_value = "4")]
    pub sessions: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Initial Pomodoro configuration from the CLI duration flags
    pub fn pomodoro(&self) -> PomodoroConfig {
        PomodoroConfig::from_minutes(self.focus, self.short_break, self.long_break, self.sessions)
    }
}

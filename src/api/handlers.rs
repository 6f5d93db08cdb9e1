//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    engine::{format_duration, PomodoroConfig, TimerMode},
    state::AppState,
};
use super::responses::{
    ApiResponse, CountdownRequest, HealthResponse, PomodoroRequest, StatusResponse,
};

/// Handle POST /start - Begin or resume the timer
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.with_engine("start", |engine| engine.start()) {
        Ok((Ok(()), timer)) => {
            info!("Start endpoint called - timer running in {} mode", timer.mode);
            Ok(Json(ApiResponse::ok("Timer started".to_string(), timer)))
        }
        Ok((Err(e), timer)) => {
            // Validation failure: previous state is intact, surface the message
            warn!("Start rejected: {}", e);
            Ok(Json(ApiResponse::error(e.to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to start timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - Pause the timer
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.with_engine("pause", |engine| engine.pause()) {
        Ok(((), timer)) => {
            info!("Pause endpoint called - elapsed display is {}", timer.display);
            Ok(Json(ApiResponse::ok("Timer paused".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to pause timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Reset the timer to its initial state
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.with_engine("reset", |engine| engine.reset()) {
        Ok(((), timer)) => {
            info!("Reset endpoint called");
            Ok(Json(ApiResponse::ok("Timer reset".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to reset timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /lap - Record a lap (running stopwatch only)
pub async fn lap_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let recorded = |engine: &mut crate::engine::TimerEngine| {
        let before = engine.laps().len();
        engine.lap();
        engine.laps().len() > before
    };

    match state.with_engine("lap", recorded) {
        Ok((true, timer)) => {
            info!("Lap recorded ({} total)", timer.laps.len());
            Ok(Json(ApiResponse::ok("Lap recorded".to_string(), timer)))
        }
        Ok((false, timer)) => {
            // Lap outside a running stopwatch is a silent no-op
            Ok(Json(ApiResponse::ok("Lap ignored".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to record lap: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /mode/:mode - Switch timer mode, resetting all run state
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse>), StatusCode> {
    let mode: TimerMode = match mode.parse() {
        Ok(mode) => mode,
        Err(e) => {
            warn!("Mode endpoint called with invalid mode: {}", e);
            let timer = state.get_snapshot().map_err(|err| {
                error!("Failed to get timer snapshot: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
            return Ok((StatusCode::BAD_REQUEST, Json(ApiResponse::error(e, timer))));
        }
    };

    match state.with_engine("mode", |engine| engine.set_mode(mode)) {
        Ok(((), timer)) => {
            info!("Mode endpoint called - switched to {} mode", mode);
            Ok((
                StatusCode::OK,
                Json(ApiResponse::ok(format!("Switched to {} mode", mode), timer)),
            ))
        }
        Err(e) => {
            error!("Failed to switch mode: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /countdown - Configure the countdown duration
pub async fn countdown_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CountdownRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let result = state.with_engine("countdown", |engine| {
        engine.set_countdown_target(request.hours, request.minutes, request.seconds)
    });

    match result {
        Ok((Ok(target), timer)) => {
            info!("Countdown target set to {}", format_duration(target));
            Ok(Json(ApiResponse::ok(
                format!("Countdown time set to {}", format_duration(target)),
                timer,
            )))
        }
        Ok((Err(e), timer)) => {
            warn!("Countdown target rejected: {}", e);
            Ok(Json(ApiResponse::error(e.to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to set countdown target: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pomodoro - Configure Pomodoro durations and restart the cycle
pub async fn pomodoro_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PomodoroRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let config = PomodoroConfig::from_minutes(
        request.focus_min,
        request.short_break_min,
        request.long_break_min,
        request.sessions,
    );

    match state.with_engine("pomodoro", |engine| engine.set_pomodoro_config(config)) {
        Ok(((), timer)) => {
            info!(
                "Pomodoro settings applied: focus={} short={} long={} sessions={}",
                format_duration(config.focus),
                format_duration(config.short_break),
                format_duration(config.long_break),
                config.sessions_before_long_break,
            );
            Ok(Json(ApiResponse::ok("Pomodoro settings applied".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to apply Pomodoro settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the current timer snapshot and server metadata
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

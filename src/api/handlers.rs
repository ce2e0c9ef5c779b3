//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::state::{AppState, ConfigUpdate, PauseOutcome, StartOutcome};
use super::responses::{ApiResponse, ConfigResponse, HealthResponse, StatusResponse};

/// Handle POST /start - Start the sequence, or stop it if already running
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start() {
        Ok((StartOutcome::Started, display)) => {
            info!("Start endpoint called - sequence started");
            Ok(Json(ApiResponse::running("Interval timer started".to_string(), display)))
        }
        Ok((StartOutcome::Stopped, display)) => {
            info!("Start endpoint called - sequence stopped");
            Ok(Json(ApiResponse::idle("Interval timer stopped".to_string(), display)))
        }
        Ok((StartOutcome::Rejected, display)) => {
            info!("Start endpoint called - configuration cannot run");
            Ok(Json(ApiResponse::rejected(
                "Work time and loop count must be greater than zero".to_string(),
                display,
            )))
        }
        Err(e) => {
            error!("Failed to toggle timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stop - Stop and reset the sequence
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.stop() {
        Ok(display) => {
            info!("Stop endpoint called - timer reset");
            Ok(Json(ApiResponse::idle("Interval timer stopped".to_string(), display)))
        }
        Err(e) => {
            error!("Failed to stop timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - Pause or resume the running sequence
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.toggle_pause() {
        Ok((PauseOutcome::Paused, display)) => {
            info!("Pause endpoint called - timer paused");
            Ok(Json(ApiResponse::paused("Interval timer paused".to_string(), display)))
        }
        Ok((PauseOutcome::Resumed, display)) => {
            info!("Pause endpoint called - timer resumed");
            Ok(Json(ApiResponse::running("Interval timer resumed".to_string(), display)))
        }
        Ok((PauseOutcome::Ignored, display)) => {
            Ok(Json(ApiResponse::ignored("Interval timer is not running".to_string(), display)))
        }
        Err(e) => {
            error!("Failed to toggle pause: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /config - Return the current configuration
pub async fn get_config_handler(State(state): State<Arc<AppState>>) -> Result<Json<ConfigResponse>, StatusCode> {
    match state.get_config() {
        Ok(config) => Ok(Json(ConfigResponse::new("ok", config))),
        Err(e) => {
            error!("Failed to get configuration: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle PUT /config - Update configuration fields while idle
pub async fn update_config_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<ConfigResponse>, StatusCode> {
    match state.update_config(update) {
        Ok((true, config)) => Ok(Json(ConfigResponse::new("updated", config))),
        Ok((false, config)) => {
            info!("Configuration update ignored while running");
            Ok(Json(ConfigResponse::new("ignored", config)))
        }
        Err(e) => {
            error!("Failed to update configuration: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the display state and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let display = match state.get_display() {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to get display state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let config = match state.get_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to get configuration: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        display,
        config,
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

//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{DisplayState, TimerConfig};

/// API response structure for control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub display: DisplayState,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, display: DisplayState) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            display,
        }
    }

    pub fn running(message: String, display: DisplayState) -> Self {
        Self::new("running", message, display)
    }

    pub fn paused(message: String, display: DisplayState) -> Self {
        Self::new("paused", message, display)
    }

    pub fn idle(message: String, display: DisplayState) -> Self {
        Self::new("idle", message, display)
    }

    /// The request was refused; state is unchanged
    pub fn rejected(message: String, display: DisplayState) -> Self {
        Self::new("rejected", message, display)
    }

    /// The request had no effect in the current state
    pub fn ignored(message: String, display: DisplayState) -> Self {
        Self::new("ignored", message, display)
    }
}

/// Response for configuration reads and updates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub config: TimerConfig,
}

impl ConfigResponse {
    pub fn new(status: &str, config: TimerConfig) -> Self {
        Self {
            status: status.to_string(),
            timestamp: Utc::now(),
            config,
        }
    }
}

/// Status response with display and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub display: DisplayState,
    pub config: TimerConfig,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

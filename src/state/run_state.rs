//! Timer configuration and run state structures

use serde::{Deserialize, Serialize};

/// Milliseconds removed from the countdown on every tick
pub const TICK_MS: i64 = 10;

/// Longest phase accepted, in seconds; longer settings are clamped
pub const MAX_PHASE_SECONDS: f64 = 1.0e12;

/// User-supplied timer configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Number of work repetitions
    pub total_loops: i64,
    /// Length of each work phase in seconds
    pub work_seconds: f64,
    /// Length of the rest inserted between loops in seconds
    pub rest_seconds: f64,
}

impl TimerConfig {
    pub fn new(total_loops: i64, work_seconds: f64, rest_seconds: f64) -> Self {
        Self {
            total_loops,
            work_seconds,
            rest_seconds,
        }
    }

    /// Check whether a run can be started with this configuration
    pub fn is_startable(&self) -> bool {
        self.work_seconds > 0.0 && self.total_loops > 0
    }

    pub fn work_ms(&self) -> i64 {
        seconds_to_ms(self.work_seconds)
    }

    pub fn rest_ms(&self) -> i64 {
        seconds_to_ms(self.rest_seconds)
    }

    /// Apply a partial update, keeping fields that are not provided
    pub fn merged(&self, update: &ConfigUpdate) -> Self {
        Self {
            total_loops: update.total_loops.unwrap_or(self.total_loops),
            work_seconds: update.work_seconds.unwrap_or(self.work_seconds),
            rest_seconds: update.rest_seconds.unwrap_or(self.rest_seconds),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new(4, 10.0, 3.0)
    }
}

/// Partial configuration change coming from the input collaborator
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub total_loops: Option<i64>,
    pub work_seconds: Option<f64>,
    pub rest_seconds: Option<f64>,
}

fn seconds_to_ms(seconds: f64) -> i64 {
    // NaN maps to 0 through the cast
    (seconds.clamp(-MAX_PHASE_SECONDS, MAX_PHASE_SECONDS) * 1000.0).round() as i64
}

/// Activity the countdown currently represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Work,
    Rest,
}

/// Mutable state of a running sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub remaining_ms: i64,
    pub current_loop: i64,
    pub phase: Phase,
    pub running: bool,
    pub paused: bool,
}

impl RunState {
    /// Create the idle state
    pub fn idle() -> Self {
        Self {
            remaining_ms: 0,
            current_loop: 0,
            phase: Phase::Work,
            running: false,
            paused: false,
        }
    }

    /// Create the state at the beginning of the first work phase
    pub fn first_loop(work_ms: i64) -> Self {
        Self {
            remaining_ms: work_ms,
            current_loop: 1,
            phase: Phase::Work,
            running: true,
            paused: false,
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::idle()
    }

    /// Whether the tick loop should be advancing this state
    pub fn is_ticking(&self) -> bool {
        self.running && !self.paused
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::idle()
    }
}

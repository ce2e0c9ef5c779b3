//! Display state derived from the controller for renderers

use serde::{Deserialize, Serialize};

use super::{Phase, RunState, TimerConfig};
use crate::config::LabelSet;

/// Phase as shown to the user, including the idle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayPhase {
    Idle,
    Work,
    Rest,
}

impl DisplayPhase {
    /// Styling key used by clients
    pub fn key(&self) -> &'static str {
        match self {
            DisplayPhase::Idle => "phase-stopped",
            DisplayPhase::Work => "phase-work",
            DisplayPhase::Rest => "phase-interval",
        }
    }
}

/// Everything a display surface renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    pub current_loop: i64,
    pub total_loops: i64,
    pub phase: DisplayPhase,
    pub phase_key: String,
    pub label: String,
    pub running: bool,
    pub paused: bool,
    /// Remaining time while running, configured work time otherwise
    pub remaining_ms: i64,
    pub countdown: String,
    pub unit: String,
}

impl DisplayState {
    pub fn from_state(config: &TimerConfig, run: &RunState, labels: &LabelSet) -> Self {
        let phase = if run.phase == Phase::Rest {
            DisplayPhase::Rest
        } else if run.running {
            DisplayPhase::Work
        } else {
            DisplayPhase::Idle
        };

        let label = match phase {
            DisplayPhase::Idle => labels.idle,
            DisplayPhase::Work => labels.work,
            DisplayPhase::Rest => labels.rest,
        };

        let remaining_ms = if run.running {
            run.remaining_ms
        } else {
            config.work_ms()
        };

        Self {
            current_loop: run.current_loop,
            total_loops: config.total_loops,
            phase,
            phase_key: phase.key().to_string(),
            label: label.to_string(),
            running: run.running,
            paused: run.paused,
            remaining_ms,
            countdown: format_countdown(remaining_ms),
            unit: labels.unit.to_string(),
        }
    }

    /// Loop counter as "current / total"
    pub fn loop_counter(&self) -> String {
        format!("{} / {}", self.current_loop, self.total_loops)
    }

    /// Single-line rendering used by the terminal display
    pub fn render_line(&self) -> String {
        let pause_marker = if self.paused { " (paused)" } else { "" };
        format!(
            "{}  {}  {}{}{}",
            self.loop_counter(),
            self.label,
            self.countdown,
            self.unit,
            pause_marker
        )
    }
}

/// Format milliseconds as seconds with two decimals, floored at "0.00"
pub fn format_countdown(ms: i64) -> String {
    if ms <= 0 {
        return "0.00".to_string();
    }
    let centis = ms / 10 + i64::from(ms % 10 >= 5);
    format!("{}.{:02}", centis / 100, centis % 100)
}

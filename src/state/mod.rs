//! State management module
//! 
//! This module contains the timer data model, the phase state machine and the
//! application state that schedules its ticks.

pub mod run_state;
pub mod controller;
pub mod display;
pub mod app_state;

// Re-export main types
pub use run_state::{ConfigUpdate, Phase, RunState, TimerConfig, MAX_PHASE_SECONDS, TICK_MS};
pub use controller::{IntervalController, PauseOutcome, StartOutcome};
pub use display::{format_countdown, DisplayPhase, DisplayState};
pub use app_state::AppState;

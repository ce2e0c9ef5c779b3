//! Interval Timer - A work/rest interval timer with audio cues
//! 
//! This library provides the phase state machine that alternates work and rest
//! periods, the tick scheduling around it, audio cue playback and an HTTP API
//! for controlling the timer and reading its display state.

pub mod config;
pub mod state;
pub mod audio;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, IntervalController};
pub use api::create_router;
pub use utils::signals::shutdown_signal;

//! Audio cue module
//!
//! This module contains the cue identifiers, the audio context that owns
//! preloaded cue sounds, and the players the controller emits cues to.

pub mod context;
pub mod cue;
pub mod player;

// Re-export main types
pub use context::{AudioContext, ContextState};
pub use cue::Cue;
pub use player::{default_player_command, BellCuePlayer, CuePlayer, SilentCuePlayer, SystemCuePlayer};

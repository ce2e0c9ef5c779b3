//! Audio cue identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

/// Timer events that have a sound attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    StartWork,
    StopWork,
    Pause,
    Finish,
}

impl Cue {
    pub const ALL: [Cue; 4] = [Cue::StartWork, Cue::StopWork, Cue::Pause, Cue::Finish];

    /// File name of the sound inside the cue directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Cue::StartWork => "start-work.mp3",
            Cue::StopWork => "stop-work.mp3",
            Cue::Pause => "pause.mp3",
            Cue::Finish => "finish.mp3",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cue::StartWork => "start-work",
            Cue::StopWork => "stop-work",
            Cue::Pause => "pause",
            Cue::Finish => "finish",
        };
        f.write_str(name)
    }
}

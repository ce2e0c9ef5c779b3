//! Cue players used by the interval controller

use std::{
    io::{self, Write},
    path::PathBuf,
    sync::{Arc, Mutex},
};
use tracing::{debug, info};

use super::{AudioContext, Cue};

/// Sink for timer cues
///
/// `play` is called while the controller lock is held, so implementations
/// must return immediately and never fail.
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: Cue);

    /// Start loading cue sounds in the background
    fn preload(&self) {}

    /// Release audio resources
    fn release(&self) {}
}

/// Plays nothing
#[derive(Debug, Default)]
pub struct SilentCuePlayer;

impl CuePlayer for SilentCuePlayer {
    fn play(&self, cue: Cue) {
        debug!("Muted cue: {}", cue);
    }
}

/// Rings the terminal bell for every cue
#[derive(Debug, Default)]
pub struct BellCuePlayer;

impl CuePlayer for BellCuePlayer {
    fn play(&self, cue: Cue) {
        debug!("Bell for cue: {}", cue);
        let _ = ring_bell(&mut std::io::stdout());
    }
}

/// Write the ASCII bell character and flush
pub fn ring_bell<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(b"\x07")?;
    out.flush()
}

/// Plays cue files from a directory through an external audio player
#[derive(Debug)]
pub struct SystemCuePlayer {
    player_command: String,
    sound_dir: PathBuf,
    context: Mutex<Option<Arc<AudioContext>>>,
}

impl SystemCuePlayer {
    pub fn new(player_command: String, sound_dir: PathBuf) -> Self {
        Self {
            player_command,
            sound_dir,
            context: Mutex::new(None),
        }
    }

    /// Get the audio context, creating it on first use
    pub fn context(&self) -> Option<Arc<AudioContext>> {
        let mut slot = self.context.lock().ok()?;
        let context = slot.get_or_insert_with(|| {
            info!("Creating audio context using {}", self.player_command);
            Arc::new(AudioContext::new(self.player_command.clone()))
        });
        Some(Arc::clone(context))
    }

    pub fn sound_dir(&self) -> &PathBuf {
        &self.sound_dir
    }
}

impl CuePlayer for SystemCuePlayer {
    fn play(&self, cue: Cue) {
        if let Some(context) = self.context() {
            context.play(cue);
        }
    }

    fn preload(&self) {
        let Some(context) = self.context() else {
            return;
        };
        let sound_dir = self.sound_dir.clone();
        tokio::spawn(async move {
            context.preload(&sound_dir).await;
        });
    }

    fn release(&self) {
        let context = self.context.lock().ok().and_then(|mut slot| slot.take());
        if let Some(context) = context {
            info!("Releasing audio context");
            context.close();
        }
    }
}

/// Default audio player; cue data arrives on stdin
pub fn default_player_command() -> &'static str {
    "mpv --no-video --really-quiet -"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::ContextState;

    #[test]
    fn bell_writes_one_bell_character() {
        let mut out = Vec::new();
        ring_bell(&mut out).expect("write");
        assert_eq!(out, b"\x07");
    }

    #[test]
    fn default_player_reads_from_stdin() {
        assert!(default_player_command().ends_with(" -"));
    }

    #[tokio::test]
    async fn context_is_created_lazily_and_reused() {
        let player = SystemCuePlayer::new("true".to_string(), PathBuf::from("/nonexistent"));
        assert!(player.context.lock().expect("lock").is_none());

        let first = player.context().expect("context");
        let second = player.context().expect("context");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn release_closes_context_and_next_use_recreates_it() {
        let player = SystemCuePlayer::new("true".to_string(), PathBuf::from("/nonexistent"));
        let first = player.context().expect("context");

        player.release();
        assert_eq!(first.state(), ContextState::Closed);

        let second = player.context().expect("context");
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.state(), ContextState::Running);
    }

    #[tokio::test]
    async fn play_with_missing_sounds_is_silent() {
        let player = SystemCuePlayer::new("true".to_string(), PathBuf::from("/nonexistent"));
        player.preload();
        tokio::task::yield_now().await;
        for cue in Cue::ALL {
            player.play(cue);
        }
        assert_eq!(player.context().expect("context").loaded_count(), 0);
    }
}

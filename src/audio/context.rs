//! Audio context holding preloaded cues and their playback processes

use std::{
    collections::HashMap,
    env,
    path::Path,
    process::Stdio,
    sync::{Arc, Mutex, RwLock},
};
use tokio::{
    io::AsyncWriteExt,
    process::{Child, Command},
    runtime::Handle,
};
use tracing::{debug, info, warn};

use super::Cue;

/// Lifecycle of the audio context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Running,
    Suspended,
    Closed,
}

/// Owns the loaded cue bank and the player processes currently sounding
///
/// Cue sounds are read into memory once and streamed to the player's stdin
/// on every play, so the player command must read audio from stdin.
#[derive(Debug)]
pub struct AudioContext {
    program: String,
    args: Vec<String>,
    state: Mutex<ContextState>,
    bank: RwLock<HashMap<Cue, Arc<[u8]>>>,
    playing: Mutex<HashMap<Cue, Child>>,
}

impl AudioContext {
    /// Create a running context with an empty cue bank
    pub fn new(player_command: String) -> Self {
        let mut parts = player_command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        let args = parts.collect();

        Self {
            program,
            args,
            state: Mutex::new(ContextState::Running),
            bank: RwLock::new(HashMap::new()),
            playing: Mutex::new(HashMap::new()),
        }
    }

    pub fn state(&self) -> ContextState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(ContextState::Closed)
    }

    fn set_state(&self, new_state: ContextState) {
        if let Ok(mut state) = self.state.lock() {
            *state = new_state;
        }
    }

    /// Load every cue from `sound_dir` into memory; cues that fail to load are skipped
    pub async fn preload(&self, sound_dir: &Path) {
        for cue in Cue::ALL {
            let path = sound_dir.join(cue.file_name());
            match tokio::fs::read(&path).await {
                Ok(bytes) if !bytes.is_empty() => {
                    debug!("Loaded {} cue ({} bytes) from {}", cue, bytes.len(), path.display());
                    if let Ok(mut bank) = self.bank.write() {
                        bank.insert(cue, Arc::from(bytes));
                    }
                }
                Ok(_) => warn!("Cue file {} is empty, {} cue disabled", path.display(), cue),
                Err(e) => warn!("Failed to load {} cue from {}: {}", cue, path.display(), e),
            }
        }
        info!("Audio cues ready: {}/{}", self.loaded_count(), Cue::ALL.len());
    }

    /// Loaded sound data for `cue`
    pub fn cue_bytes(&self, cue: Cue) -> Option<Arc<[u8]>> {
        self.bank.read().ok().and_then(|bank| bank.get(&cue).cloned())
    }

    pub fn is_loaded(&self, cue: Cue) -> bool {
        self.cue_bytes(cue).is_some()
    }

    pub fn loaded_count(&self) -> usize {
        self.bank.read().map(|bank| bank.len()).unwrap_or(0)
    }

    /// Number of player processes currently attached to the context
    pub fn active_playbacks(&self) -> usize {
        self.playing.lock().map(|playing| playing.len()).unwrap_or(0)
    }

    /// Bring a suspended context back; fails while the player is unavailable
    pub fn resume(&self) -> bool {
        match self.state() {
            ContextState::Running => true,
            ContextState::Suspended => {
                if !program_available(&self.program) {
                    debug!("Audio player {} still unavailable", self.program);
                    return false;
                }
                debug!("Resuming suspended audio context");
                self.set_state(ContextState::Running);
                true
            }
            ContextState::Closed => false,
        }
    }

    /// Halt all output and hold playback until the next resume
    pub fn suspend(&self) {
        if self.state() != ContextState::Running {
            return;
        }
        self.kill_all();
        self.set_state(ContextState::Suspended);
        debug!("Audio context suspended");
    }

    /// Play `cue` from the beginning, cutting off any earlier playback of it
    pub fn play(&self, cue: Cue) {
        let Some(bytes) = self.cue_bytes(cue) else {
            debug!("Cue {} not loaded, dropping", cue);
            return;
        };

        if Handle::try_current().is_err() {
            debug!("No runtime available, dropping {} cue", cue);
            return;
        }

        if !self.resume() {
            debug!("Audio context not running, dropping {} cue", cue);
            return;
        }

        let Ok(mut playing) = self.playing.lock() else {
            return;
        };

        if let Some(mut previous) = playing.remove(&cue) {
            let _ = previous.start_kill();
        }

        let spawned = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        match spawned {
            Ok(mut child) => {
                if let Some(mut stdin) = child.stdin.take() {
                    tokio::spawn(async move {
                        if let Err(e) = stdin.write_all(&bytes).await {
                            debug!("Player closed input for {} cue early: {}", cue, e);
                        }
                    });
                }
                playing.insert(cue, child);
            }
            Err(e) => {
                warn!("Failed to play {} cue with {}: {}", cue, self.program, e);
                drop(playing);
                self.suspend();
            }
        }
    }

    /// Stop all playback and drop the cue bank
    pub fn close(&self) {
        self.kill_all();
        if let Ok(mut bank) = self.bank.write() {
            bank.clear();
        }
        self.set_state(ContextState::Closed);
    }

    fn kill_all(&self) {
        if let Ok(mut playing) = self.playing.lock() {
            for (_, mut child) in playing.drain() {
                let _ = child.start_kill();
            }
        }
    }
}

/// Whether `program` can be launched, either as a path or through PATH
fn program_available(program: &str) -> bool {
    if program.is_empty() {
        return false;
    }
    if program.contains(std::path::MAIN_SEPARATOR) {
        return Path::new(program).is_file();
    }
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}

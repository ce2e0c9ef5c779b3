//! Work/rest phase state machine

use std::sync::Arc;
use tracing::{debug, info};

use super::{display::DisplayState, Phase, RunState, TimerConfig, TICK_MS};
use crate::{
    audio::{Cue, CuePlayer},
    config::LabelSet,
};

/// Result of a start/stop toggle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    Stopped,
    /// Configuration cannot run; nothing changed
    Rejected,
}

/// Result of a pause/resume toggle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    Paused,
    Resumed,
    /// Timer not running; nothing changed
    Ignored,
}

/// Owns the timer configuration and run state and applies every transition
pub struct IntervalController {
    config: TimerConfig,
    run: RunState,
    player: Arc<dyn CuePlayer>,
}

impl IntervalController {
    pub fn new(config: TimerConfig, player: Arc<dyn CuePlayer>) -> Self {
        Self {
            config,
            run: RunState::idle(),
            player,
        }
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    pub fn is_running(&self) -> bool {
        self.run.running
    }

    pub fn is_ticking(&self) -> bool {
        self.run.is_ticking()
    }

    /// Replace the configuration; ignored while a sequence is running
    pub fn set_config(&mut self, config: TimerConfig) -> bool {
        if self.run.running {
            debug!("Ignoring configuration change while running");
            return false;
        }
        self.config = config;
        true
    }

    pub fn set_total_loops(&mut self, total_loops: i64) -> bool {
        self.set_config(TimerConfig { total_loops, ..self.config })
    }

    pub fn set_work_seconds(&mut self, work_seconds: f64) -> bool {
        self.set_config(TimerConfig { work_seconds, ..self.config })
    }

    pub fn set_rest_seconds(&mut self, rest_seconds: f64) -> bool {
        self.set_config(TimerConfig { rest_seconds, ..self.config })
    }

    /// Start a new sequence, or stop the current one
    pub fn start(&mut self) -> StartOutcome {
        if self.run.running {
            self.stop();
            return StartOutcome::Stopped;
        }
        if !self.config.is_startable() {
            debug!("Rejecting start with configuration {:?}", self.config);
            return StartOutcome::Rejected;
        }

        self.run = RunState::first_loop(self.config.work_ms());
        info!(
            "Starting {} loops of {}s work / {}s rest",
            self.config.total_loops, self.config.work_seconds, self.config.rest_seconds
        );
        self.player.play(Cue::StartWork);
        StartOutcome::Started
    }

    /// Reset to idle
    pub fn stop(&mut self) {
        if self.run.running {
            info!("Stopping at loop {}/{}", self.run.current_loop, self.config.total_loops);
        }
        self.run = RunState::idle();
    }

    pub fn toggle_pause(&mut self) -> PauseOutcome {
        if !self.run.running {
            return PauseOutcome::Ignored;
        }
        if self.run.paused {
            self.run.paused = false;
            debug!("Resumed with {}ms left", self.run.remaining_ms);
            self.player.play(Cue::StartWork);
            PauseOutcome::Resumed
        } else {
            self.run.paused = true;
            debug!("Paused with {}ms left", self.run.remaining_ms);
            self.player.play(Cue::Pause);
            PauseOutcome::Paused
        }
    }

    /// Advance the countdown by one tick
    pub fn tick(&mut self) {
        if !self.run.is_ticking() {
            return;
        }

        let next = self.run.remaining_ms - TICK_MS;
        if next > 0 {
            self.run.remaining_ms = next;
            return;
        }

        let has_next_loop = self.run.current_loop < self.config.total_loops;

        if self.run.phase == Phase::Work && self.config.rest_seconds > 0.0 && has_next_loop {
            self.run.phase = Phase::Rest;
            self.run.remaining_ms = self.config.rest_ms();
            debug!("Loop {} work done, resting", self.run.current_loop);
            self.player.play(Cue::StopWork);
        } else if has_next_loop {
            if self.run.phase == Phase::Rest {
                self.player.play(Cue::StartWork);
            }
            self.run.current_loop += 1;
            self.run.phase = Phase::Work;
            self.run.remaining_ms = self.config.work_ms();
            debug!("Starting loop {}/{}", self.run.current_loop, self.config.total_loops);
        } else {
            info!("All {} loops complete", self.config.total_loops);
            self.player.play(Cue::Finish);
            self.stop();
        }
    }

    /// Derive what the display surface shows
    pub fn display(&self, labels: &LabelSet) -> DisplayState {
        DisplayState::from_state(&self.config, &self.run, labels)
    }
}

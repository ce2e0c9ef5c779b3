//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use super::{
    ConfigUpdate, DisplayState, IntervalController, PauseOutcome, StartOutcome, TimerConfig,
};
use crate::{audio::CuePlayer, config::LabelSet, tasks::tick_task};

/// Controller plus the bookkeeping of its tick task, guarded by one lock
struct TimerCore {
    controller: IntervalController,
    /// Bumped on every cancellation; a tick task only applies ticks for its own generation
    generation: u64,
    ticker: Option<JoinHandle<()>>,
}

impl TimerCore {
    fn cancel_ticker(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.ticker.take() {
            handle.abort();
            debug!("Tick task cancelled (generation {})", self.generation);
        }
    }
}

/// Main application state that owns the interval controller and its tick task
pub struct AppState {
    core: Mutex<TimerCore>,
    player: Arc<dyn CuePlayer>,
    pub labels: LabelSet,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for display updates
    pub display_tx: watch::Sender<DisplayState>,
    /// Keep the receiver alive to prevent channel closure
    pub _display_rx: watch::Receiver<DisplayState>,
}

impl AppState {
    /// Create a new AppState with an idle controller
    pub fn new(
        port: u16,
        host: String,
        timer_config: TimerConfig,
        labels: LabelSet,
        player: Arc<dyn CuePlayer>,
    ) -> Self {
        let controller = IntervalController::new(timer_config, Arc::clone(&player));
        let (display_tx, display_rx) = watch::channel(controller.display(&labels));

        Self {
            core: Mutex::new(TimerCore {
                controller,
                generation: 0,
                ticker: None,
            }),
            player,
            labels,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            display_tx,
            _display_rx: display_rx,
        }
    }

    /// Apply an update to the controller, reschedule ticking and publish the result
    fn update_controller<F, R>(self: &Arc<Self>, action: &str, updater: F) -> Result<(R, DisplayState), String>
    where
        F: FnOnce(&mut IntervalController) -> R,
    {
        let mut core = self.core.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        let outcome = updater(&mut core.controller);

        // Whatever happened, the previous tick task must not survive it
        core.cancel_ticker();
        if core.controller.is_ticking() {
            let generation = core.generation;
            let state = Arc::clone(self);
            core.ticker = Some(tokio::spawn(tick_task(state, generation)));
            debug!("Tick task scheduled (generation {})", generation);
        }

        let display = core.controller.display(&self.labels);
        drop(core);

        self.record_action(action);
        self.publish(display.clone());
        Ok((outcome, display))
    }

    /// Toggle start/stop
    pub fn start(self: &Arc<Self>) -> Result<(StartOutcome, DisplayState), String> {
        let result = self.update_controller("start", |controller| controller.start())?;
        info!("Start requested: {:?}", result.0);
        Ok(result)
    }

    /// Stop and reset
    pub fn stop(self: &Arc<Self>) -> Result<DisplayState, String> {
        let (_, display) = self.update_controller("stop", |controller| controller.stop())?;
        info!("Stop requested");
        Ok(display)
    }

    /// Toggle pause/resume
    pub fn toggle_pause(self: &Arc<Self>) -> Result<(PauseOutcome, DisplayState), String> {
        let result = self.update_controller("pause", |controller| controller.toggle_pause())?;
        info!("Pause toggled: {:?}", result.0);
        Ok(result)
    }

    /// Apply one tick for the task of `generation`; returns whether that task should keep running
    pub fn tick(&self, generation: u64) -> Result<bool, String> {
        let mut core = self.core.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        if core.generation != generation {
            return Ok(false);
        }

        core.controller.tick();
        let keep_ticking = core.controller.is_ticking();
        if !keep_ticking {
            // Sequence finished; this task exits on its own
            core.ticker = None;
            core.generation += 1;
        }
        let display = core.controller.display(&self.labels);
        drop(core);

        self.publish(display);
        Ok(keep_ticking)
    }

    /// Update the configuration; ignored while running
    pub fn update_config(&self, update: ConfigUpdate) -> Result<(bool, TimerConfig), String> {
        let mut core = self.core.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        let merged = core.controller.config().merged(&update);
        let applied = core.controller.set_config(merged);
        let config = core.controller.config();
        let display = core.controller.display(&self.labels);
        drop(core);

        if applied {
            info!("Configuration updated: {:?}", config);
            self.record_action("config");
            self.publish(display);
        }
        Ok((applied, config))
    }

    /// Get current timer configuration
    pub fn get_config(&self) -> Result<TimerConfig, String> {
        self.core.lock()
            .map(|core| core.controller.config())
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Get current display state
    pub fn get_display(&self) -> Result<DisplayState, String> {
        self.core.lock()
            .map(|core| core.controller.display(&self.labels))
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Whether a tick task is currently scheduled
    pub fn has_ticker(&self) -> bool {
        self.core.lock()
            .map(|core| core.ticker.is_some())
            .unwrap_or(false)
    }

    /// Generation of the currently scheduled tick task
    pub fn generation(&self) -> Result<u64, String> {
        self.core.lock()
            .map(|core| core.generation)
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Start loading audio cues in the background
    pub fn preload_audio(&self) {
        self.player.preload();
    }

    /// Stop ticking and release audio resources
    pub fn shutdown(&self) {
        if let Ok(mut core) = self.core.lock() {
            core.cancel_ticker();
            core.controller.stop();
        }
        self.player.release();
        info!("Timer state shut down");
    }

    fn publish(&self, display: DisplayState) {
        if let Err(e) = self.display_tx.send(display) {
            warn!("Failed to send display update: {}", e);
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{audio::SilentCuePlayer, state::DisplayPhase};
    use std::time::Duration;
    use tokio::time::sleep;

    fn app(loops: i64, work: f64, rest: f64) -> Arc<AppState> {
        Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            TimerConfig::new(loops, work, rest),
            LabelSet::english(),
            Arc::new(SilentCuePlayer),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn two_loop_scenario_runs_on_the_tick_task() {
        let state = app(2, 1.0, 1.0);
        let (outcome, _) = state.start().expect("start");
        assert_eq!(outcome, StartOutcome::Started);
        assert!(state.has_ticker());

        sleep(Duration::from_millis(1_005)).await;
        let display = state.get_display().expect("display");
        assert_eq!(display.phase, DisplayPhase::Rest);
        assert_eq!(display.remaining_ms, 1_000);
        assert_eq!(display.current_loop, 1);

        sleep(Duration::from_millis(1_000)).await;
        let display = state.get_display().expect("display");
        assert_eq!(display.phase, DisplayPhase::Work);
        assert_eq!(display.remaining_ms, 1_000);
        assert_eq!(display.current_loop, 2);

        sleep(Duration::from_millis(1_000)).await;
        let display = state.get_display().expect("display");
        assert!(!display.running);
        assert_eq!(display.current_loop, 0);
        assert!(!state.has_ticker());
    }

    #[tokio::test(start_paused = true)]
    async fn single_loop_finishes_without_rest() {
        let state = app(1, 2.0, 5.0);
        state.start().expect("start");

        sleep(Duration::from_millis(1_995)).await;
        assert_eq!(state.get_display().expect("display").phase, DisplayPhase::Work);

        sleep(Duration::from_millis(10)).await;
        let display = state.get_display().expect("display");
        assert_eq!(display.phase, DisplayPhase::Idle);
        assert!(!display.running);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_remaining_time() {
        let state = app(2, 1.0, 1.0);
        state.start().expect("start");
        sleep(Duration::from_millis(305)).await;

        let (outcome, display) = state.toggle_pause().expect("pause");
        assert_eq!(outcome, PauseOutcome::Paused);
        assert_eq!(display.remaining_ms, 700);
        assert!(!state.has_ticker());

        sleep(Duration::from_millis(5_000)).await;
        assert_eq!(state.get_display().expect("display").remaining_ms, 700);

        let (outcome, _) = state.toggle_pause().expect("resume");
        assert_eq!(outcome, PauseOutcome::Resumed);
        assert!(state.has_ticker());

        sleep(Duration::from_millis(105)).await;
        assert_eq!(state.get_display().expect("display").remaining_ms, 600);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_ticking_immediately() {
        let state = app(3, 1.0, 1.0);
        state.start().expect("start");
        sleep(Duration::from_millis(55)).await;

        let display = state.stop().expect("stop");
        assert!(!display.running);
        assert!(!state.has_ticker());

        sleep(Duration::from_millis(500)).await;
        let again = state.stop().expect("stop");
        assert_eq!(display, again);
        assert_eq!(state.get_display().expect("display"), display);
    }

    #[tokio::test]
    async fn stale_generation_tick_is_ignored() {
        let state = app(2, 1.0, 1.0);
        state.start().expect("start");
        let stale = state.generation().expect("generation");

        state.toggle_pause().expect("pause");
        state.toggle_pause().expect("resume");
        let before = state.get_display().expect("display");

        assert!(!state.tick(stale).expect("tick"));
        assert_eq!(state.get_display().expect("display"), before);
    }

    #[tokio::test]
    async fn restart_replaces_the_tick_task() {
        let state = app(2, 1.0, 1.0);
        state.start().expect("start");
        let first = state.generation().expect("generation");

        state.start().expect("stop");
        state.start().expect("start");
        let second = state.generation().expect("generation");

        assert!(second > first);
        assert!(!state.tick(first).expect("tick"));
        assert!(state.tick(second).expect("tick"));
    }

    #[tokio::test]
    async fn config_update_ignored_while_running() {
        let state = app(2, 1.0, 1.0);
        let update = ConfigUpdate {
            total_loops: Some(5),
            ..Default::default()
        };

        state.start().expect("start");
        let (applied, config) = state.update_config(update).expect("update");
        assert!(!applied);
        assert_eq!(config.total_loops, 2);

        state.stop().expect("stop");
        let (applied, config) = state.update_config(update).expect("update");
        assert!(applied);
        assert_eq!(config.total_loops, 5);
        assert_eq!(state.get_display().expect("display").total_loops, 5);
    }

    #[tokio::test]
    async fn invalid_configuration_is_rejected() {
        let state = app(0, 1.0, 1.0);
        let (outcome, display) = state.start().expect("start");
        assert_eq!(outcome, StartOutcome::Rejected);
        assert!(!display.running);
        assert!(!state.has_ticker());
    }

    #[tokio::test]
    async fn actions_are_published_to_watchers() {
        let state = app(2, 1.0, 1.0);
        let mut rx = state.display_tx.subscribe();

        state.start().expect("start");
        assert!(rx.has_changed().expect("channel"));
        assert!(rx.borrow_and_update().running);

        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(time.is_some());
    }
}

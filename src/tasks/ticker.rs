//! Countdown tick background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant};
use tracing::{debug, error};

use crate::state::{AppState, TICK_MS};

/// Drive the controller at a fixed period until it stops ticking or this
/// task's generation is cancelled
pub async fn tick_task(state: Arc<AppState>, generation: u64) {
    debug!("Tick task {} started", generation);

    let period = Duration::from_millis(TICK_MS as u64);
    let mut interval = interval_at(Instant::now() + period, period);

    loop {
        interval.tick().await;

        match state.tick(generation) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                error!("Failed to apply tick: {}", e);
                break;
            }
        }
    }

    debug!("Tick task {} finished", generation);
}

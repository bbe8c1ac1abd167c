//! Per-run countdown tick loop

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::{AppState, TickOutcome, TimerId};

/// Wall-clock time between two wakes of a tick loop
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Drive one run of a timer until it finishes or is superseded.
///
/// Spawned once per fresh start. Pausing only gates the decrement, so the
/// loop keeps its phase across pause/resume. A reset or a newer run makes
/// the loop's `run` stale and it exits on its next wake without touching
/// state.
pub async fn tick_loop(state: Arc<AppState>, id: TimerId, run: u64) {
    debug!(timer = %id, run, "Tick loop started");

    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let outcome = match state.tick(id, run) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(timer = %id, run, "Tick failed, stopping loop: {}", e);
                break;
            }
        };

        match outcome {
            TickOutcome::Decremented => debug!(timer = %id, run, "Tick"),
            TickOutcome::Skipped => debug!(timer = %id, run, "Tick skipped while paused"),
            TickOutcome::Finished => info!(timer = %id, run, "Countdown finished"),
            TickOutcome::Stale => debug!(timer = %id, run, "Run superseded, tick loop exiting"),
        }

        if !outcome.keeps_loop_alive() {
            break;
        }
    }
}

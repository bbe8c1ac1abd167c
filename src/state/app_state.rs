//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use super::{Controls, Countdown, StartOutcome, TickOutcome, TimerId, TimerView};
use crate::{error::TimerError, tasks::tick_loop};

/// Capacity of the shared display update channel
const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// Mutable part of a timer, guarded as one unit
#[derive(Debug)]
struct SlotInner {
    countdown: Countdown,
    /// Raw text of the duration input field
    input: String,
}

/// One independently addressable timer
#[derive(Debug)]
pub struct TimerSlot {
    pub id: TimerId,
    pub label: String,
    inner: Mutex<SlotInner>,
    /// Latest display snapshot for this timer
    view_tx: watch::Sender<TimerView>,
}

impl TimerSlot {
    fn new(id: TimerId, default_input: &str) -> Self {
        let label = format!("Timer {}", id);
        let countdown = Countdown::new();
        let view = TimerView::project(id, &label, &countdown, default_input);
        let (view_tx, _) = watch::channel(view);

        Self {
            id,
            label,
            inner: Mutex::new(SlotInner {
                countdown,
                input: default_input.to_string(),
            }),
            view_tx,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SlotInner>, TimerError> {
        self.inner.lock().map_err(|_| TimerError::LockPoisoned)
    }

    fn project(&self, inner: &SlotInner) -> TimerView {
        TimerView::project(self.id, &self.label, &inner.countdown, &inner.input)
    }

    /// Current display snapshot
    pub fn view(&self) -> Result<TimerView, TimerError> {
        let inner = self.lock()?;
        Ok(self.project(&inner))
    }

    /// Watch this timer's display snapshots
    pub fn subscribe(&self) -> watch::Receiver<TimerView> {
        self.view_tx.subscribe()
    }
}

/// Host state that owns every timer and fans out display updates
#[derive(Debug)]
pub struct AppState {
    pub timers: Vec<TimerSlot>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Every display snapshot, in emission order
    pub update_tx: broadcast::Sender<TimerView>,
}

impl AppState {
    /// Create `timer_count` idle timers with ids `1..=timer_count`
    pub fn new(port: u16, host: String, timer_count: u32, default_input: &str) -> Self {
        let (update_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        let timers = (1..=timer_count)
            .map(|n| TimerSlot::new(TimerId(n), default_input))
            .collect();

        Self {
            timers,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            update_tx,
        }
    }

    pub fn slot(&self, id: TimerId) -> Result<&TimerSlot, TimerError> {
        self.timers
            .iter()
            .find(|slot| slot.id == id)
            .ok_or(TimerError::UnknownTimer(id))
    }

    /// Subscribe to display updates from every timer
    pub fn subscribe(&self) -> broadcast::Receiver<TimerView> {
        self.update_tx.subscribe()
    }

    pub fn snapshot(&self, id: TimerId) -> Result<TimerView, TimerError> {
        self.slot(id)?.view()
    }

    pub fn snapshots(&self) -> Result<Vec<TimerView>, TimerError> {
        self.timers.iter().map(TimerSlot::view).collect()
    }

    /// Apply `updater` to one timer and publish the resulting snapshot.
    ///
    /// Publishing happens under the slot lock so that snapshots of one timer
    /// leave in the same order their states were reached. A failed updater
    /// publishes nothing.
    fn update_timer<T, F>(&self, id: TimerId, action: &str, updater: F) -> Result<(T, TimerView), TimerError>
    where
        F: FnOnce(&mut SlotInner) -> Result<T, TimerError>,
    {
        let slot = self.slot(id)?;
        let mut inner = slot.lock()?;

        let result = match updater(&mut *inner) {
            Ok(result) => result,
            Err(e) => {
                warn!(timer = %id, kind = e.kind(), "Rejected {}: {}", action, e);
                return Err(e);
            }
        };

        let view = slot.project(&inner);
        self.publish(slot, view.clone());
        drop(inner);

        self.record_action(id, action);
        Ok((result, view))
    }

    fn publish(&self, slot: &TimerSlot, view: TimerView) {
        slot.view_tx.send_replace(view.clone());
        // No subscribers is normal when nothing is rendering
        let _ = self.update_tx.send(view);
    }

    fn record_action(&self, id: TimerId, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(format!("{} timer {}", action, id));
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Replace the text of a timer's duration input field
    pub fn set_input(&self, id: TimerId, value: &str) -> Result<TimerView, TimerError> {
        let ((), view) = self.update_timer(id, "edit input of", |inner| {
            if !Controls::for_status(inner.countdown.status()).input_editable {
                return Err(TimerError::InputLocked);
            }
            inner.input = value.to_string();
            Ok(())
        })?;
        Ok(view)
    }

    /// Start a fresh run or resume a paused one.
    ///
    /// A fresh run reads `duration` when given, otherwise the stored input
    /// text, and spawns the run's tick loop. Must be called from within a
    /// tokio runtime.
    pub fn start(self: &Arc<Self>, id: TimerId, duration: Option<&str>) -> Result<TimerView, TimerError> {
        let (outcome, view) = self.update_timer(id, "start", |inner| {
            let text = duration.map(str::to_string).unwrap_or_else(|| inner.input.clone());
            let outcome = inner.countdown.start(&text)?;
            if outcome != StartOutcome::Resumed {
                inner.input = text;
            }
            Ok(outcome)
        })?;

        match outcome {
            StartOutcome::Fresh { run } => {
                info!(timer = %id, run, seconds = view.initial_seconds, "Countdown started");
                tokio::spawn(tick_loop(Arc::clone(self), id, run));
            }
            StartOutcome::Resumed => {
                info!(timer = %id, remaining = view.remaining_seconds, "Countdown resumed");
            }
            StartOutcome::Completed => {
                info!(timer = %id, "Zero-second countdown finished immediately");
            }
        }
        Ok(view)
    }

    pub fn pause(&self, id: TimerId) -> Result<TimerView, TimerError> {
        let ((), view) = self.update_timer(id, "pause", |inner| inner.countdown.pause())?;
        info!(timer = %id, remaining = view.remaining_seconds, "Countdown paused");
        Ok(view)
    }

    pub fn reset(&self, id: TimerId) -> Result<TimerView, TimerError> {
        let ((), view) = self.update_timer(id, "reset", |inner| {
            inner.countdown.reset();
            Ok(())
        })?;
        info!(timer = %id, remaining = view.remaining_seconds, "Countdown reset");
        Ok(view)
    }

    /// One wake of the tick loop spawned for `run`
    pub fn tick(&self, id: TimerId, run: u64) -> Result<TickOutcome, TimerError> {
        let slot = self.slot(id)?;
        let mut inner = slot.lock()?;

        let outcome = inner.countdown.tick(run);
        if outcome.changed_state() {
            let view = slot.project(&inner);
            self.publish(slot, view);
        }
        Ok(outcome)
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

//! State management module
//! 
//! This module contains the countdown state machine, its display projection
//! and the host state that owns every timer.

pub mod countdown;
pub mod view;
pub mod app_state;

// Re-export main types
pub use countdown::{parse_duration, Countdown, StartOutcome, Status, TickOutcome, TimerId};
pub use view::{Controls, TimerView};
pub use app_state::{AppState, TimerSlot};

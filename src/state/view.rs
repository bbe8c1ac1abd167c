//! Display snapshot handed to the presentation layer

use serde::{Deserialize, Serialize};

use super::{Countdown, Status, TimerId};

/// Which controls the presentation layer should offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub start_enabled: bool,
    pub pause_enabled: bool,
    pub reset_enabled: bool,
    pub input_editable: bool,
}

impl Controls {
    pub fn for_status(status: Status) -> Self {
        match status {
            Status::Idle | Status::Finished => Self {
                start_enabled: true,
                pause_enabled: false,
                reset_enabled: false,
                input_editable: true,
            },
            Status::Running => Self {
                start_enabled: false,
                pause_enabled: true,
                reset_enabled: true,
                input_editable: false,
            },
            // start means "resume" here
            Status::Paused => Self {
                start_enabled: true,
                pause_enabled: false,
                reset_enabled: true,
                input_editable: false,
            },
        }
    }
}

/// Everything needed to render one timer, derived purely from its state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerView {
    pub id: TimerId,
    pub label: String,
    pub status: Status,
    /// `MM:SS` of the remaining time
    pub formatted_time: String,
    pub remaining_text: String,
    pub remaining_seconds: u64,
    pub initial_seconds: u64,
    /// Elapsed share of the current run in `[0, 1]`
    pub progress: f64,
    /// Raw text of the duration input field
    pub input: String,
    pub controls: Controls,
}

impl TimerView {
    pub fn project(id: TimerId, label: &str, countdown: &Countdown, input: &str) -> Self {
        let remaining = countdown.remaining_seconds();
        Self {
            id,
            label: label.to_string(),
            status: countdown.status(),
            formatted_time: format_clock(remaining),
            remaining_text: format!("Remaining: {}s", remaining),
            remaining_seconds: remaining,
            initial_seconds: countdown.initial_seconds(),
            progress: countdown.progress(),
            input: input.to_string(),
            controls: Controls::for_status(countdown.status()),
        }
    }
}

/// Format seconds as `MM:SS`; minutes are not wrapped into hours
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

//! Error types for timer operations

use thiserror::Error;

use crate::state::{Status, TimerId};

/// Every way a timer operation can be refused.
///
/// A refused operation never changes timer state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Duration text is not a whole, non-negative number of seconds
    #[error("invalid duration {input:?}: expected a whole number of seconds")]
    InvalidDuration { input: String },

    /// Operation is not allowed in the current status
    #[error("cannot {action} a timer that is {status}")]
    InvalidTransition { action: &'static str, status: Status },

    /// Duration input cannot be edited while a run is in progress
    #[error("duration input is locked while the timer is running or paused")]
    InputLocked,

    /// Request could not be decoded (bad timer id, malformed body)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no timer with id {0}")]
    UnknownTimer(TimerId),

    #[error("timer state lock poisoned")]
    LockPoisoned,
}

impl TimerError {
    /// Short machine-readable kind, used in logs and API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDuration { .. } => "invalid_duration",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::InputLocked => "input_locked",
            Self::InvalidRequest(_) => "invalid_request",
            Self::UnknownTimer(_) => "unknown_timer",
            Self::LockPoisoned => "lock_poisoned",
        }
    }
}

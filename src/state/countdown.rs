//! Countdown state machine
//!
//! `Countdown` owns the numbers and the status of a single timer and nothing
//! else. It knows nothing about clocks or rendering: the tick loop calls
//! [`Countdown::tick`] once per second and the host projects the result into
//! a [`TimerView`](super::TimerView).
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --start--> Running
//!                    |                                    |
//!                    +------- remaining hits 0 ------> Finished
//! any --reset--> Idle
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Stable identifier of a timer inside the host, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(pub u32);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Running,
    Paused,
    Finished,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Running => "running",
            Status::Paused => "paused",
            Status::Finished => "finished",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new run began; exactly one tick loop must be spawned for `run`
    Fresh { run: u64 },
    /// A paused run continues; its tick loop is still alive
    Resumed,
    /// A zero-second run finished on the spot; no tick loop is needed
    Completed,
}

/// What a single wake of the tick loop did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// One second was taken off `remaining`
    Decremented,
    /// Paused: nothing changed, keep waking
    Skipped,
    /// The last second was taken off and the run is over
    Finished,
    /// The loop belongs to a run that was reset or replaced; exit quietly
    Stale,
}

impl TickOutcome {
    /// Whether the loop that produced this outcome should keep waking
    pub fn keeps_loop_alive(&self) -> bool {
        matches!(self, TickOutcome::Decremented | TickOutcome::Skipped)
    }

    /// Whether this wake changed anything worth rendering
    pub fn changed_state(&self) -> bool {
        matches!(self, TickOutcome::Decremented | TickOutcome::Finished)
    }
}

/// Parse the raw text of a duration input into whole seconds.
///
/// Surrounding whitespace is ignored. Anything that is not a non-negative
/// integer is rejected.
pub fn parse_duration(input: &str) -> Result<u64, TimerError> {
    input
        .trim()
        .parse::<u64>()
        .map_err(|_| TimerError::InvalidDuration {
            input: input.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    initial_seconds: u64,
    remaining_seconds: u64,
    status: Status,
    /// Generation of the current run; bumped by every fresh start and reset
    run: u64,
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            initial_seconds: 0,
            remaining_seconds: 0,
            status: Status::Idle,
            run: 0,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn initial_seconds(&self) -> u64 {
        self.initial_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// Elapsed share of the current run in `[0, 1]`, 0 when the run is empty
    pub fn progress(&self) -> f64 {
        if self.initial_seconds == 0 {
            return 0.0;
        }
        (self.initial_seconds - self.remaining_seconds) as f64 / self.initial_seconds as f64
    }

    /// Start a fresh run from `input`, or resume a paused one.
    ///
    /// Resuming ignores `input` entirely. A failed parse leaves every field
    /// untouched.
    pub fn start(&mut self, input: &str) -> Result<StartOutcome, TimerError> {
        match self.status {
            Status::Paused => {
                self.status = Status::Running;
                Ok(StartOutcome::Resumed)
            }
            Status::Running => Err(TimerError::InvalidTransition {
                action: "start",
                status: self.status,
            }),
            Status::Idle | Status::Finished => {
                let seconds = parse_duration(input)?;
                self.run += 1;
                self.initial_seconds = seconds;
                self.remaining_seconds = seconds;
                if seconds == 0 {
                    self.status = Status::Finished;
                    Ok(StartOutcome::Completed)
                } else {
                    self.status = Status::Running;
                    Ok(StartOutcome::Fresh { run: self.run })
                }
            }
        }
    }

    pub fn pause(&mut self) -> Result<(), TimerError> {
        if self.status != Status::Running {
            return Err(TimerError::InvalidTransition {
                action: "pause",
                status: self.status,
            });
        }
        self.status = Status::Paused;
        Ok(())
    }

    /// Rewind to the last started duration and go idle.
    ///
    /// Any live tick loop becomes stale and exits on its next wake.
    pub fn reset(&mut self) {
        self.run += 1;
        self.status = Status::Idle;
        self.remaining_seconds = self.initial_seconds;
    }

    /// One wake of the tick loop spawned for `run`.
    pub fn tick(&mut self, run: u64) -> TickOutcome {
        if run != self.run {
            return TickOutcome::Stale;
        }
        match self.status {
            Status::Paused => TickOutcome::Skipped,
            Status::Running => {
                self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
                if self.remaining_seconds == 0 {
                    self.status = Status::Finished;
                    TickOutcome::Finished
                } else {
                    TickOutcome::Decremented
                }
            }
            Status::Idle | Status::Finished => TickOutcome::Stale,
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

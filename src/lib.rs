//! Multi Countdown - A state-managed HTTP host for independent countdown timers
//! 
//! Each timer is a small state machine (idle, running, paused, finished)
//! driven by its own once-per-second tick loop. Display snapshots are pushed
//! to whatever presentation layer subscribes.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::{AppState, TimerId, TimerView};
pub use api::create_router;
pub use utils::signals::shutdown_signal;

//! Background tasks module
//! 
//! This module contains the per-timer tick loop and the tasks that render
//! display updates alongside the HTTP server.

pub mod tick_loop;
pub mod display_log;

// Re-export main functions
pub use tick_loop::{tick_loop, TICK_PERIOD};
pub use display_log::display_log_task;

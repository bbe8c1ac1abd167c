//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::parse_duration;

/// Upper bound on hosted timers
pub const MAX_TIMERS: u32 = 32;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "multi-countdown")]
#[command(about = "A state-managed HTTP host for independent countdown timers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20560")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Number of independent timers to host
    #[arg(short, long, default_value = "3")]
    pub timers: u32,

    /// Initial text of every timer's duration input, in seconds
    #[arg(short, long, default_value = "60")]
    pub default_duration: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Check values clap cannot check on its own
    pub fn validate(&self) -> Result<(), String> {
        if self.timers == 0 || self.timers > MAX_TIMERS {
            return Err(format!(
                "--timers must be between 1 and {}, got {}",
                MAX_TIMERS, self.timers
            ));
        }
        parse_duration(&self.default_duration)
            .map_err(|e| format!("--default-duration: {}", e))?;
        Ok(())
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

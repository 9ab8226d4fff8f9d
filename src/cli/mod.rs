//! CLI command implementations

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{vaccinare_config, SchedulingApi};
use crate::session::{HttpSession, SessionConfig};

pub mod counties;
pub mod error;
pub mod slots;

pub use counties::GetCountiesArgs;
pub use error::CliError;
pub use slots::GetAvailableSlotsArgs;

/// Poll the vaccination scheduling API for appointment availability.
#[derive(Debug, Parser)]
#[command(name = "vaccinare-slots", version, about)]
pub struct Cli {
    /// Verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Cache lifetime in seconds; unset disables the fresh-cache tier
    #[arg(long, value_name = "SECONDS")]
    pub cache_lifetime: Option<u64>,

    /// Fallback cache lifetime in seconds; unset disables the fallback tier
    #[arg(long, value_name = "SECONDS")]
    pub fallback_cache_lifetime: Option<u64>,

    /// Cache directory
    #[arg(long, default_value = "var/cache")]
    pub cache_path: PathBuf,

    /// Minimum delay between requests, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 0.1)]
    pub delay_between_requests: f64,

    /// Max number of retries after a failed request
    #[arg(long, default_value_t = 0)]
    pub max_retries: u32,

    /// Delay between retries, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 1.0)]
    pub delay_between_retries: f64,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the county listing as JSON
    GetCounties(GetCountiesArgs),
    /// Enumerate available slots for all centres and write a report
    GetAvailableSlots(GetAvailableSlotsArgs),
}

impl Cli {
    /// Session configuration derived from the global options.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            session_token: None,
            cache_lifetime: self.cache_lifetime.map(Duration::from_secs),
            fallback_cache_lifetime: self.fallback_cache_lifetime.map(Duration::from_secs),
            cache_path: Some(self.cache_path.clone()),
            delay_between_requests: duration_from_secs(self.delay_between_requests),
            max_retries: self.max_retries,
            delay_between_retries: duration_from_secs(self.delay_between_retries),
        }
    }

    /// Build the API client against the production upstream.
    pub fn build_api(&self) -> SchedulingApi {
        let session = HttpSession::new(vaccinare_config(), self.session_config());
        SchedulingApi::new(Arc::new(session))
    }
}

fn duration_from_secs(secs: f64) -> Option<Duration> {
    (secs > 0.0).then(|| Duration::from_secs_f64(secs))
}

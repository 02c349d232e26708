//! Process configuration: command line, environment, and secrets.
//!
//! Values are read once at process entry and passed explicitly into the
//! clients that need them.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::SearchRadius;

/// Default timeout for every outbound HTTP call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Parser, Debug)]
#[command(
    name = "event-finder",
    about = "Find Ticketmaster events near a UK postcode and export them as CSV"
)]
pub struct Cli {
    /// Ticketmaster Discovery API key
    #[arg(long, env = "TICKETMASTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Timeout for each outbound request, in seconds
    #[arg(
        long,
        env = "EVENT_FINDER_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the web interface
    Serve {
        /// Socket address to listen on
        #[arg(long, env = "EVENT_FINDER_ADDRESS", default_value = "127.0.0.1:3000")]
        address: SocketAddr,

        /// Directory of static assets
        #[arg(long, default_value = "static")]
        static_dir: PathBuf,
    },

    /// Run one search and write <POSTCODE>.csv
    Export {
        /// UK postcode to search around
        postcode: String,

        /// Search radius in miles
        #[arg(
            long,
            default_value_t = SearchRadius::DEFAULT,
            value_parser = clap::value_parser!(u8).range(1..=100)
        )]
        radius: u8,

        /// Directory to write the CSV into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

/// Configuration errors, all fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TICKETMASTER_API_KEY is not set; add it to the environment or a .env file")]
    MissingApiKey,

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// The Ticketmaster API key.
///
/// `Debug` output is redacted so the key never reaches the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Build from an optional configured value. Blank counts as missing.
    pub fn from_config(value: Option<String>) -> Result<Self, ConfigError> {
        match value.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(ApiKey(key.to_string())),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

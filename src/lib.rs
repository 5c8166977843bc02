//! Bounty-Harvest: reward table harvester for bug-bounty platforms
//!
//! This crate walks the public program listings of several bug-bounty
//! platforms, fetches each program's detail resource, extracts the reward
//! tables embedded in it and writes everything that was collected to a JSON
//! artifact named after how the run ended.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;
pub mod platform;
pub mod session;
pub mod state;

use thiserror::Error;

/// Main error type for Bounty-Harvest operations
///
/// Only errors that escape the per-page and per-item guarded regions end up
/// here; everything below that granularity is logged and downgraded.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid header {name}: {message}")]
    InvalidHeader { name: String, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}

/// Result type alias for Bounty-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{Amount, ListingItem, ProgramResult, RewardRecord};
pub use platform::{PlatformKind, PlatformProfile};
pub use state::{CrawlPhase, RunOutcome, RunState};

//! Configuration module for Bounty-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use bounty_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("bugcrowd.toml")).unwrap();
//! println!("Harvesting platform: {}", config.platform.kind);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, PlatformConfig, UserAgentConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

// Re-export validation for configurations modified after loading
pub use validation::validate;

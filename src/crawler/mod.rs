//! Crawler module for listing and detail fetching
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching through the run's session
//! - Paginated listing fetch and item mapping
//! - Per-item detail enrichment and classification
//! - Fixed pacing and overall crawl coordination

mod coordinator;
pub mod detail;
mod fetcher;
pub mod listing;
mod pacing;

pub use coordinator::{run_crawl, Coordinator, RunReport};
pub use fetcher::{decode_json, get_json, get_text, post_json, FetchError, ScrapeError};
pub use pacing::{pause, Pacing};

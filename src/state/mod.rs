//! State module for tracking run progress
//!
//! # Components
//!
//! - `CrawlPhase`: Where the run is (bootstrapping, a listing page, an item, finalizing)
//! - `RunOutcome`: How the run ended
//! - `RunState`: The accumulated results, statistics and start time of a run

mod phase;
mod run_state;

// Re-export main types
pub use phase::{CrawlPhase, RunOutcome};
pub use run_state::RunState;

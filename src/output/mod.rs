//! Output module for persisting run results
//!
//! This module handles:
//! - Writing the accumulated results to an outcome-named JSON artifact
//! - Guaranteeing the write happens once on every exit path
//! - Recording run statistics

mod checkpoint;
mod json_sink;
pub mod stats;
mod traits;

pub use checkpoint::CheckpointGuard;
pub use json_sink::JsonFileSink;
pub use stats::{print_statistics, RunStats};
pub use traits::{OutputError, OutputResult, OutputSink, SinkReport};

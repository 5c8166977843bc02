//! Output sink trait and types

use crate::model::ProgramResult;
use crate::state::RunOutcome;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// What a sink did with a run's results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkReport {
    /// `count` results written to `path`
    Written { path: PathBuf, count: usize },

    /// No results; no artifact was created
    NothingToWrite,
}

/// Trait for output sinks
///
/// A sink is invoked exactly once per run, with the results accumulated so
/// far and the outcome that selects the artifact name.
pub trait OutputSink {
    /// Persists the results
    ///
    /// # Arguments
    ///
    /// * `results` - Results in the order items were attempted
    /// * `outcome` - How the run ended
    fn write(&self, results: &[ProgramResult], outcome: RunOutcome) -> OutputResult<SinkReport>;
}

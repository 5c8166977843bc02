//! JSON file sink
//!
//! Writes the results as one indented JSON array. The file name encodes
//! the run outcome so a completed run never overwrites a partial or
//! error-dump artifact, and vice versa.

use super::traits::{OutputResult, OutputSink, SinkReport};
use crate::model::ProgramResult;
use crate::state::RunOutcome;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Sink writing `{stem}_rewards_{final|partial|error_dump}.json` in a directory
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    directory: PathBuf,
    stem: String,
}

impl JsonFileSink {
    pub fn new(directory: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            stem: stem.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns the artifact path used for `outcome`
    pub fn artifact_path(&self, outcome: RunOutcome) -> PathBuf {
        let suffix = match outcome {
            RunOutcome::CompletedNormally => "final",
            RunOutcome::InterruptedByUser => "partial",
            RunOutcome::AbortedOnError => "error_dump",
        };
        self.directory
            .join(format!("{}_rewards_{}.json", self.stem, suffix))
    }
}

impl OutputSink for JsonFileSink {
    fn write(&self, results: &[ProgramResult], outcome: RunOutcome) -> OutputResult<SinkReport> {
        if results.is_empty() {
            tracing::warn!("No data to save ({} run); no file written", outcome);
            return Ok(SinkReport::NothingToWrite);
        }

        fs::create_dir_all(&self.directory)?;
        let path = self.artifact_path(outcome);

        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, results)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::info!("Results saved to {} ({} programs)", path.display(), results.len());
        Ok(SinkReport::Written {
            path,
            count: results.len(),
        })
    }
}

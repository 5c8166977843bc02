//! Process-scoped run accumulator

use super::{CrawlPhase, RunOutcome};
use crate::model::ProgramResult;
use crate::output::RunStats;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Everything a run has accumulated so far
///
/// Lives for one crawl invocation. The output sink reads `results` and the
/// outcome at teardown.
#[derive(Debug)]
pub struct RunState {
    /// Platform identifier the run targets
    pub platform: String,

    /// Results in the order items were attempted
    pub results: Vec<ProgramResult>,

    pub started_at: DateTime<Utc>,
    started: Instant,

    phase: CrawlPhase,

    pub stats: RunStats,
}

impl RunState {
    /// Creates an empty state for a new run
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            results: Vec::new(),
            started_at: Utc::now(),
            started: Instant::now(),
            phase: CrawlPhase::Bootstrapping,
            stats: RunStats::default(),
        }
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves to `next`, logging transitions that break the phase order
    pub fn enter(&mut self, next: CrawlPhase) {
        if self.phase.is_terminal() {
            tracing::debug!("Ignoring phase {} after the run finished", next);
            return;
        }
        if !self.phase.can_transition_to(&next) {
            tracing::debug!("Unexpected phase transition: {} -> {}", self.phase, next);
        }
        tracing::trace!("Phase: {}", next);
        self.phase = next;
    }

    /// Records a finished item
    pub fn push_result(&mut self, result: ProgramResult) {
        self.stats.items_included += 1;
        if result.no_data_found {
            self.stats.item_failures += 1;
        }
        self.results.push(result);
    }

    /// The terminal outcome, once the run has finished
    pub fn outcome(&self) -> Option<RunOutcome> {
        match self.phase {
            CrawlPhase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

//! Guaranteed finalization of a run
//!
//! `CheckpointGuard` owns the `RunState` for the duration of a run. An
//! explicit `finish` hands the results to the sink with the run's outcome;
//! if the guard is dropped without `finish` (an early return, a panic, or
//! the run future being dropped) the results are written as an error dump.
//! Either way the sink is invoked exactly once.

use super::traits::{OutputResult, OutputSink, SinkReport};
use crate::state::{CrawlPhase, RunOutcome, RunState};

/// Drop guard around a run's state
pub struct CheckpointGuard<'a> {
    sink: &'a dyn OutputSink,
    state: RunState,
    finished: bool,
}

impl<'a> CheckpointGuard<'a> {
    pub fn new(sink: &'a dyn OutputSink, state: RunState) -> Self {
        Self {
            sink,
            state,
            finished: false,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RunState {
        &mut self.state
    }

    /// Writes the results for `outcome` and returns the finished state
    pub fn finish(mut self, outcome: RunOutcome) -> (RunState, OutputResult<SinkReport>) {
        self.finished = true;
        let report = persist(self.sink, &mut self.state, outcome);

        let placeholder = RunState::new(self.state.platform.clone());
        (std::mem::replace(&mut self.state, placeholder), report)
    }
}

impl Drop for CheckpointGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        tracing::error!(
            "Run ended without finalizing during {}; saving error dump",
            self.state.phase()
        );
        if let Err(e) = persist(self.sink, &mut self.state, RunOutcome::AbortedOnError) {
            tracing::error!("Failed to save error dump: {}", e);
        }
    }
}

fn persist(
    sink: &dyn OutputSink,
    state: &mut RunState,
    outcome: RunOutcome,
) -> OutputResult<SinkReport> {
    state.enter(CrawlPhase::Finalizing);
    let report = sink.write(&state.results, outcome);
    state.enter(CrawlPhase::Finished(outcome));
    report
}

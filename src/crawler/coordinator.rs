//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates:
//! - Bootstrapping the session once
//! - Walking the fixed listing page range
//! - Enriching each listed item, strictly one request at a time
//! - Pacing between items and pages
//! - Observing cancellation between operations
//!
//! Page and item failures are downgraded where they happen; the loop
//! itself cannot fail. Whatever escapes it (a panic, the run future being
//! dropped) is caught by the `CheckpointGuard` wrapped around the run.

use crate::config::Config;
use crate::crawler::detail::enrich;
use crate::crawler::listing::{fetch_listing_page, map_item};
use crate::crawler::pacing::pause;
use crate::output::{CheckpointGuard, OutputSink, RunStats, SinkReport};
use crate::platform::PlatformProfile;
use crate::session::{bootstrap_session, Session};
use crate::state::{CrawlPhase, RunOutcome, RunState};
use crate::HarvestError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Main crawler coordinator structure
pub struct Coordinator<'a> {
    profile: &'a PlatformProfile,
    session: Session,
    cancel: CancellationToken,
}

impl<'a> Coordinator<'a> {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `profile` - The resolved platform profile
    /// * `session` - The run's session, owned exclusively by the coordinator
    /// * `cancel` - Token signalled on user interruption
    pub fn new(profile: &'a PlatformProfile, session: Session, cancel: CancellationToken) -> Self {
        Self {
            profile,
            session,
            cancel,
        }
    }

    /// Runs the main crawl loop
    ///
    /// This is the core crawling logic that:
    /// 1. Bootstraps the session (if the platform needs a token)
    /// 2. Fetches each listing page; a failed page counts as empty
    /// 3. Maps and enriches each item; malformed items are skipped
    /// 4. Appends exactly one result per enriched item
    ///
    /// # Returns
    ///
    /// `CompletedNormally` after the last page, or `InterruptedByUser` as
    /// soon as cancellation is observed.
    pub async fn run(&mut self, state: &mut RunState) -> RunOutcome {
        let profile = self.profile;
        let max_pages = profile.listing.max_pages;

        tracing::info!(
            "Starting {} crawl: {} listing page(s), detail strategy {}",
            profile.display_name,
            max_pages,
            profile.detail.name()
        );

        if let Some(spec) = &profile.bootstrap {
            bootstrap_session(&mut self.session, spec).await;
        }

        for page in 1..=max_pages {
            if self.cancel.is_cancelled() {
                return self.interrupted();
            }

            state.enter(CrawlPhase::ListingPage { page });
            state.stats.pages_attempted += 1;

            let records =
                match fetch_listing_page(&self.session, &profile.listing, &profile.base_url, page)
                    .await
                {
                    Ok(records) => records,
                    Err(e) => {
                        tracing::warn!("Error fetching program list page {}: {}", page, e);
                        state.stats.pages_failed += 1;
                        Vec::new()
                    }
                };

            if records.is_empty() {
                state.stats.pages_empty += 1;
                tracing::info!("No programs found on page {}. Continuing", page);
            }

            for (index, raw) in records.iter().enumerate() {
                if self.cancel.is_cancelled() {
                    return self.interrupted();
                }

                state.enter(CrawlPhase::ItemDetail { page, index });
                state.stats.items_seen += 1;

                let Some(item) = map_item(raw, &profile.items, &profile.base_url) else {
                    state.stats.items_skipped += 1;
                    tracing::warn!(
                        "Skipping program {} on page {} (missing essential data)",
                        index + 1,
                        page
                    );
                    continue;
                };

                tracing::info!(
                    "Processing program {}/{} on page {}: {}",
                    index + 1,
                    records.len(),
                    page,
                    item.name
                );

                let result = enrich(
                    &self.session,
                    profile,
                    &item,
                    &profile.pacing,
                    &self.cancel,
                )
                .await;

                tracing::info!(
                    "Processed: {} (offers bounties: {}, disclosure only: {}, tiers: {})",
                    result.program_name,
                    result.offers_bounties,
                    result.disclosure_only,
                    result.rewards.len()
                );
                state.push_result(result);

                if !pause(profile.pacing.item_delay, &self.cancel).await {
                    return self.interrupted();
                }
            }

            tracing::info!(
                "Finished page {}. Programs on page: {}",
                page,
                records.len()
            );

            let page_delay = profile.pacing.after_page(records.is_empty());
            if page < max_pages && !pause(page_delay, &self.cancel).await {
                return self.interrupted();
            }
        }

        RunOutcome::CompletedNormally
    }

    fn interrupted(&self) -> RunOutcome {
        tracing::warn!("Crawling interrupted by user. Saving collected data...");
        RunOutcome::InterruptedByUser
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub sink: SinkReport,
    pub results: usize,
    pub stats: RunStats,
    pub elapsed: Duration,
}

/// Runs the main crawl operation
///
/// This function orchestrates the entire run:
///
/// 1. Open the checkpoint guard around a fresh `RunState`
/// 2. Build the session from the configuration and profile headers
/// 3. Run the coordinator loop
/// 4. Finish the guard with the loop's outcome, writing the artifact
///
/// If anything between 1 and 4 unwinds, the guard writes the error dump.
///
/// # Arguments
///
/// * `config` - The loaded configuration (timeouts, user agent)
/// * `profile` - The resolved platform profile
/// * `sink` - Where the results are written
/// * `cancel` - Token signalled on user interruption
///
/// # Returns
///
/// * `Ok(RunReport)` - Outcome, what the sink did, and statistics
/// * `Err(HarvestError)` - The session could not be built or the sink failed
///
/// # Example
///
/// ```no_run
/// use bounty_harvest::config::load_config;
/// use bounty_harvest::crawler::run_crawl;
/// use bounty_harvest::output::JsonFileSink;
/// use bounty_harvest::PlatformProfile;
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let profile = PlatformProfile::from_config(&config)?;
/// let sink = JsonFileSink::new(".", profile.kind.id());
/// run_crawl(&config, &profile, &sink, CancellationToken::new()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    profile: &PlatformProfile,
    sink: &dyn OutputSink,
    cancel: CancellationToken,
) -> Result<RunReport, HarvestError> {
    let mut guard = CheckpointGuard::new(sink, RunState::new(profile.kind.id()));

    let session = Session::new(&config.user_agent, &config.crawler, &profile.headers)?;
    let mut coordinator = Coordinator::new(profile, session, cancel);
    let outcome = coordinator.run(guard.state_mut()).await;

    let (state, written) = guard.finish(outcome);
    state.stats.log(state.elapsed());
    let sink_report = written?;

    if matches!(sink_report, SinkReport::NothingToWrite) {
        tracing::warn!("No data collected from {}", profile.display_name);
    }

    Ok(RunReport {
        outcome,
        sink: sink_report,
        results: state.results.len(),
        stats: state.stats.clone(),
        elapsed: state.elapsed(),
    })
}

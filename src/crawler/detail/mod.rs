//! Detail enrichment
//!
//! Turns one `ListingItem` into exactly one `ProgramResult`. The strategy
//! that reads the detail resource is selected by the platform profile:
//! - `TwoHopJson`: detail HTML names a second JSON resource holding the rewards
//! - `RewardGrid`: detail HTML carries a label/value reward grid
//! - `TierTable`: detail HTML carries a per-tier severity table
//! - `GraphQl`: rewards come from a query-style API keyed by the item handle
//! - `OverviewOnly`: listing data is enough; no detail fetch
//!
//! Enrichment never fails. A strategy error degrades the result to empty
//! rewards with `no_data_found` set and the error message recorded.

mod classify;
mod graphql;
mod grid;
mod tiers;
mod two_hop;

pub use classify::{ClassificationRule, DisclosureCheck, OverviewDecision, SectionRule};
pub use graphql::{parse_team, GraphQlSpec, TEAM_PROFILE_QUERY};
pub use grid::{parse_grid_page, RewardGridSpec};
pub use tiers::{parse_tier_page, TierTableSpec, DEFAULT_SEVERITY_LABELS};
pub use two_hop::TwoHopSpec;

use crate::crawler::fetcher::{get_text, ScrapeError};
use crate::crawler::pacing::{pause, Pacing};
use crate::model::{Amount, ListingItem, ProgramResult, RewardRecord};
use crate::platform::PlatformProfile;
use crate::session::{Session, ACCEPT_HTML};
use tokio_util::sync::CancellationToken;

/// How a platform's detail resource is read
#[derive(Debug, Clone, PartialEq)]
pub enum DetailStrategy {
    OverviewOnly,
    TwoHopJson(TwoHopSpec),
    RewardGrid(RewardGridSpec),
    TierTable(TierTableSpec),
    GraphQl(GraphQlSpec),
}

impl DetailStrategy {
    /// Returns true if the strategy fetches the item's detail page itself
    pub fn fetches_detail_page(&self) -> bool {
        matches!(
            self,
            Self::TwoHopJson(_) | Self::RewardGrid(_) | Self::TierTable(_)
        )
    }

    /// Short name used in logs and `--dry-run` output
    pub fn name(&self) -> &'static str {
        match self {
            Self::OverviewOnly => "overview-only",
            Self::TwoHopJson(_) => "two-hop-json",
            Self::RewardGrid(_) => "reward-grid",
            Self::TierTable(_) => "tier-table",
            Self::GraphQl(_) => "graphql",
        }
    }
}

/// What a strategy read from the detail resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailOutcome {
    /// Reward tiers in document order
    pub rewards: Vec<RewardRecord>,

    /// Lowercased program tags
    pub tags: Vec<String>,

    /// Platform's own statement that the program pays bounties
    pub offers_bounties_hint: Option<bool>,

    /// The detail page itself declares the program disclosure-only
    pub disclosure_only: bool,

    /// Detail page body, kept for classification
    pub page: Option<String>,
}

/// Enriches a listing item into a program result
///
/// # Arguments
///
/// * `session` - The run's session
/// * `profile` - Platform profile selecting the strategy and rules
/// * `item` - The listing item to enrich
/// * `pacing` - Delays; the confirmation delay applies here
/// * `cancel` - Run cancellation, observed during the confirmation delay
pub async fn enrich(
    session: &Session,
    profile: &PlatformProfile,
    item: &ListingItem,
    pacing: &Pacing,
    cancel: &CancellationToken,
) -> ProgramResult {
    let mut result = base_result(profile, item);

    let outcome = match run_strategy(session, profile, item).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!("Could not read details for {}: {}", item.locator, e);
            result.no_data_found = true;
            result.fetch_error = Some(e.to_string());
            DetailOutcome::default()
        }
    };

    let reward_free = match &profile.classification {
        Some(rule) => {
            classify(
                session,
                profile,
                rule,
                item,
                &outcome,
                &mut result,
                pacing,
                cancel,
            )
            .await
        }
        None => outcome.disclosure_only,
    };

    if reward_free {
        result.disclosure_only = true;
        result.min_bounty = Some(Amount::zero());
        result.max_bounty = Some(Amount::zero());
    }

    let overview_pays = result
        .max_bounty
        .map(|max| max.is_positive())
        .unwrap_or(false);
    let rewards_pay = outcome.rewards.iter().any(RewardRecord::has_positive_amount);
    let hint_pays = outcome.offers_bounties_hint.unwrap_or(false);

    result.offers_bounties = !reward_free && (overview_pays || rewards_pay || hint_pays);
    result.rewards = outcome.rewards;
    result.tags = outcome.tags;

    result
}

fn base_result(profile: &PlatformProfile, item: &ListingItem) -> ProgramResult {
    ProgramResult {
        platform: profile.display_name.clone(),
        program_name: item.name.clone(),
        program_url: item.locator.clone(),
        offers_bounties: false,
        disclosure_only: false,
        no_data_found: false,
        min_bounty: item.overview.min_bounty,
        max_bounty: item.overview.max_bounty,
        currency: item.overview.currency.clone(),
        program_type: item.overview.program_type.clone(),
        reward_summary: item.reward_summary.clone(),
        tags: Vec::new(),
        rewards: Vec::new(),
        fetch_error: None,
    }
}

async fn run_strategy(
    session: &Session,
    profile: &PlatformProfile,
    item: &ListingItem,
) -> Result<DetailOutcome, ScrapeError> {
    match &profile.detail {
        DetailStrategy::OverviewOnly => Ok(DetailOutcome::default()),
        DetailStrategy::TwoHopJson(spec) => {
            two_hop::fetch(session, spec, &profile.base_url, item).await
        }
        DetailStrategy::RewardGrid(spec) => grid::fetch(session, spec, item).await,
        DetailStrategy::TierTable(spec) => tiers::fetch(session, spec, item).await,
        DetailStrategy::GraphQl(spec) => graphql::fetch(session, spec, item).await,
    }
}

/// Decides whether the program is reward-free
///
/// The detail page declaring disclosure-only always wins. Otherwise the
/// overview decides, and an ambiguous overview is confirmed against the
/// page text, fetching the page if the strategy did not.
#[allow(clippy::too_many_arguments)]
async fn classify(
    session: &Session,
    profile: &PlatformProfile,
    rule: &ClassificationRule,
    item: &ListingItem,
    outcome: &DetailOutcome,
    result: &mut ProgramResult,
    pacing: &Pacing,
    cancel: &CancellationToken,
) -> bool {
    if outcome.disclosure_only {
        return true;
    }

    match rule.decide(&item.overview) {
        OverviewDecision::DisclosureLabelled => true,
        OverviewDecision::Rewarded => false,
        OverviewDecision::NeedsConfirmation { bounty_labelled } => {
            tracing::debug!(
                "Confirming classification of '{}' (bounty-labelled: {})",
                item.name,
                bounty_labelled
            );

            if let Some(page) = outcome.page.as_deref() {
                return rule.check.matches(page);
            }
            if profile.detail.fetches_detail_page() {
                // The page was already attempted and failed
                return false;
            }

            tracing::info!("  Checking disclosure status for: {}", item.locator);
            let confirmed = match get_text(session, &item.locator, &[("Accept", ACCEPT_HTML)]).await
            {
                Ok(page) => rule.check.matches(&page),
                Err(e) => {
                    tracing::warn!("  Disclosure check failed for {}: {}", item.locator, e);
                    result.fetch_error = Some(e.to_string());
                    false
                }
            };
            pause(pacing.confirm_delay, cancel).await;
            confirmed
        }
    }
}

/// Crawl phase definitions for tracking run progress
///
/// A run moves `Bootstrapping -> ListingPage(n) -> ItemDetail(n, i) ->
/// ListingPage(n+1) -> ... -> Finalizing -> Finished(outcome)`.
use std::fmt;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    /// Every page was walked
    CompletedNormally,

    /// The user cancelled the run
    InterruptedByUser,

    /// An error escaped the per-page and per-item guarded regions
    AbortedOnError,
}

impl RunOutcome {
    /// Returns a short string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompletedNormally => "completed",
            Self::InterruptedByUser => "interrupted",
            Self::AbortedOnError => "aborted",
        }
    }

    /// Returns true if the run did not finish its page range
    pub fn is_partial(&self) -> bool {
        !matches!(self, Self::CompletedNormally)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    // ===== Active Phases =====
    /// Fetching the anti-CSRF token
    Bootstrapping,

    /// Fetching listing page `page` (1-based)
    ListingPage { page: u32 },

    /// Enriching item `index` (0-based) of listing page `page`
    ItemDetail { page: u32, index: usize },

    /// Handing results to the output sink
    Finalizing,

    // ===== Terminal Phase =====
    Finished(RunOutcome),
}

impl CrawlPhase {
    /// Returns true once the run has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished(_))
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// Cancellation may move any active phase straight to `Finalizing`, and
    /// only `Finalizing` may reach `Finished`.
    pub fn can_transition_to(&self, next: &CrawlPhase) -> bool {
        use CrawlPhase::*;

        match (self, next) {
            (Finished(_), _) => false,
            (_, Finalizing) => !matches!(self, Finalizing),
            (Finalizing, Finished(_)) => true,
            (_, Finished(_)) => false,
            (Bootstrapping, ListingPage { page }) => *page == 1,
            (ListingPage { page }, ListingPage { page: next_page }) => *next_page == page + 1,
            (ListingPage { page }, ItemDetail { page: item_page, index }) => {
                item_page == page && *index == 0
            }
            (
                ItemDetail { page, index },
                ItemDetail {
                    page: next_page,
                    index: next_index,
                },
            ) => next_page == page && *next_index == index + 1,
            (ItemDetail { page, .. }, ListingPage { page: next_page }) => *next_page == page + 1,
            _ => false,
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bootstrapping => write!(f, "bootstrapping"),
            Self::ListingPage { page } => write!(f, "listing page {}", page),
            Self::ItemDetail { page, index } => write!(f, "item {} of page {}", index + 1, page),
            Self::Finalizing => write!(f, "finalizing"),
            Self::Finished(outcome) => write!(f, "finished ({})", outcome),
        }
    }
}

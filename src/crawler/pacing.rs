//! Fixed request pacing
//!
//! A fixed delay follows each item, a longer one follows each listing page.
//! There is no adaptive backoff. Pauses end early when the run is
//! cancelled so an interrupt is honoured without waiting out the delay.

use crate::config::CrawlerConfig;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Delays inserted between operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// After each item's detail fetch
    pub item_delay: Duration,

    /// After each listing page (not after the last one)
    pub page_delay: Duration,

    /// After a listing page that yielded no items (not after the last one)
    pub empty_page_delay: Duration,

    /// After a classification confirmation fetch
    pub confirm_delay: Duration,
}

impl Pacing {
    /// Creates a pacing from millisecond values
    ///
    /// Empty pages are followed by the regular page delay.
    pub const fn from_millis(item: u64, page: u64, confirm: u64) -> Self {
        Self {
            item_delay: Duration::from_millis(item),
            page_delay: Duration::from_millis(page),
            empty_page_delay: Duration::from_millis(page),
            confirm_delay: Duration::from_millis(confirm),
        }
    }

    /// Sets a distinct delay after pages that yielded no items
    pub const fn with_empty_page_delay(self, millis: u64) -> Self {
        Self {
            empty_page_delay: Duration::from_millis(millis),
            ..self
        }
    }

    /// Returns the delay following a listing page
    pub fn after_page(&self, empty: bool) -> Duration {
        if empty {
            self.empty_page_delay
        } else {
            self.page_delay
        }
    }

    /// No delays at all
    pub const fn none() -> Self {
        Self::from_millis(0, 0, 0)
    }

    /// Applies the delays set in the crawler configuration
    ///
    /// A configured page delay applies to empty pages too.
    pub fn with_overrides(self, config: &CrawlerConfig) -> Self {
        Self {
            item_delay: config
                .item_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(self.item_delay),
            page_delay: config
                .page_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(self.page_delay),
            empty_page_delay: config
                .page_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(self.empty_page_delay),
            confirm_delay: config
                .confirm_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(self.confirm_delay),
        }
    }
}

/// Sleeps for `delay` unless the run is cancelled first
///
/// # Returns
///
/// * `true` - The full delay elapsed
/// * `false` - Cancellation was signalled (before or during the pause)
pub async fn pause(delay: Duration, cancel: &CancellationToken) -> bool {
    if cancel.is_cancelled() {
        return false;
    }
    if delay.is_zero() {
        return true;
    }

    tokio::select! {
        _ = tokio::time::sleep(delay) => true,
        _ = cancel.cancelled() => false,
    }
}

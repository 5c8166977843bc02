//! Run statistics
//!
//! Counters maintained by the orchestrator while it walks pages and items.
//! `items_included + items_skipped == items_seen` holds at every item
//! boundary, including when the run is interrupted.

use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Listing pages requested
    pub pages_attempted: u32,

    /// Pages that yielded no items (including failed ones)
    pub pages_empty: u32,

    /// Pages whose fetch or parse failed
    pub pages_failed: u32,

    /// Raw listing records reached by the item loop
    pub items_seen: u64,

    /// Records skipped as malformed
    pub items_skipped: u64,

    /// Records that produced a result
    pub items_included: u64,

    /// Included results whose detail resource could not be read
    pub item_failures: u64,
}

impl RunStats {
    /// Returns true if every seen item was either included or skipped
    pub fn is_balanced(&self) -> bool {
        self.items_included + self.items_skipped == self.items_seen
    }

    /// Logs the statistics at the end of a run
    pub fn log(&self, elapsed: Duration) {
        tracing::info!(
            "Pages: {} attempted, {} empty ({} failed)",
            self.pages_attempted,
            self.pages_empty,
            self.pages_failed
        );
        tracing::info!(
            "Items: {} seen, {} included, {} skipped, {} without data",
            self.items_seen,
            self.items_included,
            self.items_skipped,
            self.item_failures
        );
        tracing::info!("Elapsed: {:.1}s", elapsed.as_secs_f64());
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `elapsed` - Wall time of the run
pub fn print_statistics(stats: &RunStats, elapsed: Duration) {
    println!("=== Run Statistics ===\n");

    println!("Listing:");
    println!("  Pages attempted: {}", stats.pages_attempted);
    println!("  Empty pages: {}", stats.pages_empty);
    println!("  Failed pages: {}", stats.pages_failed);
    println!();

    println!("Items:");
    println!("  Seen: {}", stats.items_seen);
    println!("  Included: {}", stats.items_included);
    println!("  Skipped (malformed): {}", stats.items_skipped);
    println!("  Without data: {}", stats.item_failures);
    println!();

    let success_rate = if stats.items_included > 0 {
        let read = stats.items_included - stats.item_failures;
        (read as f64 / stats.items_included as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Detail Success Rate: {:.1}% in {:.1}s",
        success_rate,
        elapsed.as_secs_f64()
    );
}

//! Reward grid detail strategy
//!
//! The detail page carries a grid of severity labels and amount cells.
//! The Nth label pairs with the Nth value; pairing stops at the shorter
//! sequence.

use super::DetailOutcome;
use crate::crawler::fetcher::{get_text, ScrapeError};
use crate::extract::{parse_cell_amount, parse_selector, ExtractionError};
use crate::model::{ListingItem, RewardRecord, SeverityAmount};
use crate::session::{Session, ACCEPT_HTML};
use scraper::{ElementRef, Html};

/// Selectors of the reward grid and the program tag strip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardGridSpec {
    pub grid: String,
    pub title: String,
    pub value: String,

    /// Element inside a value cell holding the amount text
    pub amount: String,

    /// Program tags (e.g. "bounty", "hall of fame")
    pub tags: String,

    /// Lowercase tag marking a paying program
    pub bounty_tag: String,
}

pub(super) async fn fetch(
    session: &Session,
    spec: &RewardGridSpec,
    item: &ListingItem,
) -> Result<DetailOutcome, ScrapeError> {
    let page = get_text(session, &item.locator, &[("Accept", ACCEPT_HTML)]).await?;
    let mut outcome = parse_grid_page(&page, spec)?;

    if outcome.rewards.is_empty() {
        tracing::info!("No reward grid found for {}", item.locator);
    }
    outcome.page = Some(page);
    Ok(outcome)
}

/// Reads tags and the reward grid from a detail page
pub fn parse_grid_page(html: &str, spec: &RewardGridSpec) -> Result<DetailOutcome, ExtractionError> {
    let document = Html::parse_document(html);

    let tag_selector = parse_selector(&spec.tags)?;
    let tags: Vec<String> = document
        .select(&tag_selector)
        .map(|tag| text_of(&tag).to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();
    let offers_bounties_hint = Some(tags.iter().any(|tag| *tag == spec.bounty_tag));

    let grid_selector = parse_selector(&spec.grid)?;
    let title_selector = parse_selector(&spec.title)?;
    let value_selector = parse_selector(&spec.value)?;
    let amount_selector = parse_selector(&spec.amount)?;

    let mut rewards = Vec::new();
    if let Some(grid) = document.select(&grid_selector).next() {
        let mut record = RewardRecord::new("Default");

        for (title, value) in grid.select(&title_selector).zip(grid.select(&value_selector)) {
            let Some(amount) = value.select(&amount_selector).next() else {
                continue;
            };
            let raw = text_of(&amount);
            record.amounts.push(SeverityAmount {
                severity: text_of(&title),
                amount: parse_cell_amount(&raw),
                minimum: None,
                raw: Some(raw),
            });
        }

        if !record.amounts.is_empty() {
            rewards.push(record);
        }
    }

    Ok(DetailOutcome {
        rewards,
        tags,
        offers_bounties_hint,
        ..DetailOutcome::default()
    })
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

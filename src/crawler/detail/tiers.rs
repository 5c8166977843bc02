//! Tier table detail strategy
//!
//! The detail page has a "Bounties" section holding one table row per
//! reward tier and one column per severity. Column labels come from the
//! table header, or from the default severity ladder when the header is
//! missing and the column count is known.

use super::{DetailOutcome, DisclosureCheck, SectionRule};
use crate::crawler::fetcher::{get_text, ScrapeError};
use crate::extract::{parse_cell_amount, parse_selector, ExtractionError};
use crate::model::{ListingItem, RewardRecord, SeverityAmount};
use crate::session::{Session, ACCEPT_HTML};
use scraper::{ElementRef, Html, Selector};

/// Severity ladder used when a table has no header
pub const DEFAULT_SEVERITY_LABELS: [&str; 5] = ["Low", "Medium", "High", "Critical", "Exceptional"];

/// Selectors of the bounty section and its table
#[derive(Debug, Clone, PartialEq)]
pub struct TierTableSpec {
    /// Notice declaring a program without bounties
    pub notice: DisclosureCheck,

    /// The "Bounties" section holding the table
    pub section: SectionRule,

    pub table_header: String,
    pub column_label: String,
    pub row: String,
    pub column: String,
    pub tier_label: String,
    pub currency: String,

    /// Element inside a column holding the amount text
    pub value: String,

    pub referer: Option<String>,
}

struct TableSelectors {
    table_header: Selector,
    column_label: Selector,
    row: Selector,
    column: Selector,
    tier_label: Selector,
    currency: Selector,
    value: Selector,
}

impl TableSelectors {
    fn parse(spec: &TierTableSpec) -> Result<Self, ExtractionError> {
        Ok(Self {
            table_header: parse_selector(&spec.table_header)?,
            column_label: parse_selector(&spec.column_label)?,
            row: parse_selector(&spec.row)?,
            column: parse_selector(&spec.column)?,
            tier_label: parse_selector(&spec.tier_label)?,
            currency: parse_selector(&spec.currency)?,
            value: parse_selector(&spec.value)?,
        })
    }
}

pub(super) async fn fetch(
    session: &Session,
    spec: &TierTableSpec,
    item: &ListingItem,
) -> Result<DetailOutcome, ScrapeError> {
    tracing::info!("  Fetching details for: {}", item.locator);

    let mut overlay = vec![("Accept", ACCEPT_HTML)];
    if let Some(referer) = spec.referer.as_deref() {
        overlay.push(("Referer", referer));
    }
    let page = get_text(session, &item.locator, &overlay).await?;

    let mut outcome = parse_tier_page(&page, spec)?;
    outcome.page = Some(page);
    Ok(outcome)
}

/// Reads the tier table, or the disclosure-only declaration, from a page
pub fn parse_tier_page(html: &str, spec: &TierTableSpec) -> Result<DetailOutcome, ExtractionError> {
    let disclosure = DetailOutcome {
        disclosure_only: true,
        ..DetailOutcome::default()
    };

    if spec.notice.matches(html) {
        return Ok(disclosure);
    }

    let selectors = TableSelectors::parse(spec)?;
    let document = Html::parse_document(html);

    let Some(section_header) = spec.section.find_header(&document)? else {
        let has_table = document.select(&selectors.table_header).next().is_some()
            || document.select(&selectors.row).next().is_some();
        return Ok(if has_table {
            DetailOutcome::default()
        } else {
            disclosure
        });
    };

    let Some(content) = spec.section.content_after(section_header) else {
        return Ok(DetailOutcome::default());
    };

    Ok(DetailOutcome {
        rewards: parse_table(content, &selectors),
        ..DetailOutcome::default()
    })
}

fn parse_table(content: ElementRef<'_>, selectors: &TableSelectors) -> Vec<RewardRecord> {
    let mut labels: Vec<String> = content
        .select(&selectors.table_header)
        .next()
        .map(|header| {
            header
                .select(&selectors.column_label)
                .map(|label| text_of(&label))
                .collect()
        })
        .unwrap_or_default();

    let mut records = Vec::new();

    for row in content.select(&selectors.row) {
        let columns: Vec<ElementRef<'_>> = row.select(&selectors.column).collect();
        if labels.is_empty() {
            labels = default_labels(columns.len());
        }
        if labels.is_empty() || columns.len() != labels.len() {
            continue;
        }

        let mut record = RewardRecord::new(
            row.select(&selectors.tier_label)
                .next()
                .map(|tier| text_of(&tier))
                .filter(|tier| !tier.is_empty())
                .unwrap_or_else(|| "Default".to_string()),
        );
        record.currency = row
            .select(&selectors.currency)
            .next()
            .map(|currency| text_of(&currency))
            .filter(|currency| !currency.is_empty());

        for (label, column) in labels.iter().zip(&columns) {
            let Some(value) = column.select(&selectors.value).next() else {
                continue;
            };
            let raw = text_of(&value);
            if let Some(amount) = parse_cell_amount(&raw) {
                record.amounts.push(SeverityAmount {
                    severity: label.clone(),
                    amount: Some(amount),
                    minimum: None,
                    raw: Some(raw),
                });
            }
        }

        if !record.amounts.is_empty() {
            records.push(record);
        }
    }

    records
}

/// Default labels for a headerless table: 5 columns get the full ladder, 4 drop the top
fn default_labels(column_count: usize) -> Vec<String> {
    match column_count {
        5 | 4 => DEFAULT_SEVERITY_LABELS[..column_count]
            .iter()
            .map(|label| label.to_string())
            .collect(),
        _ => Vec::new(),
    }
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

//! Intigriti: listing embedded in the search page, detail on the app host
//!
//! Two variants share the listing. The tier-table variant reads every
//! program's bounty table; the overview variant relies on the listing's
//! min/max figures and only fetches a detail page to confirm an ambiguous
//! classification.

use super::{header, ProfileParts, Urls};
use crate::crawler::detail::{
    ClassificationRule, DetailStrategy, DisclosureCheck, SectionRule, TierTableSpec,
};
use crate::crawler::listing::{ItemMapping, ListingFormat, ListingSpec, LocatorRule};
use crate::crawler::Pacing;
use crate::session::ACCEPT_HTML;

const LISTING_PATH: &str = "/researchers/bug-bounty-programs";
const DISCLOSURE_MARKER: &str = "responsible disclosure program without bounties";

pub(super) fn tier_table_profile(urls: &Urls) -> ProfileParts {
    ProfileParts {
        detail: DetailStrategy::TierTable(TierTableSpec {
            notice: notice_check(),
            section: bounties_section(),
            table_header: "lib-bounty-table-header".to_string(),
            column_label: "div.column-container div.column div.column-label".to_string(),
            row: "lib-bounty-table-row".to_string(),
            column: "div.column-container div.column".to_string(),
            tier_label: "div.row-label lib-bounty-tier-label div.copy".to_string(),
            currency: "div.row-label div.currency".to_string(),
            value: "div.range-container div".to_string(),
            referer: Some(format!("{}{}", urls.base, LISTING_PATH)),
        }),
        pacing: Pacing::from_millis(600, 1000, 0),
        ..common(urls)
    }
}

pub(super) fn overview_profile(urls: &Urls) -> ProfileParts {
    ProfileParts {
        detail: DetailStrategy::OverviewOnly,
        pacing: Pacing::from_millis(0, 1000, 500),
        ..common(urls)
    }
}

fn common(urls: &Urls) -> ProfileParts {
    ProfileParts {
        bootstrap: None,
        headers: vec![
            header("Accept", ACCEPT_HTML),
            header("Accept-Language", "en-US,en;q=0.9"),
        ],
        listing: ListingSpec {
            page_url: format!("{}{}?programs_prod%5Bpage%5D={{page}}", urls.base, LISTING_PATH),
            first_page_url: Some(format!("{}{}", urls.base, LISTING_PATH)),
            referer: None,
            accept: Some(ACCEPT_HTML.to_string()),
            format: ListingFormat::Embedded {
                anchor: r#"window[Symbol.for("InstantSearchInitialResults")]"#.to_string(),
                pointer: "/programs_prod/results/0/hits".to_string(),
            },
            max_pages: 6,
        },
        items: ItemMapping {
            name: "/name".to_string(),
            locator: LocatorRule::Template {
                template: format!("{}/programs/{{companyHandle}}/{{handle}}/detail", urls.app),
            },
            handle: Some("/handle".to_string()),
            reward_summary: None,
            program_type: Some("/programType".to_string()),
            min_bounty: Some("/minBounty/value".to_string()),
            max_bounty: Some("/maxBounty/value".to_string()),
            currency: vec![
                "/maxBounty/currency".to_string(),
                "/minBounty/currency".to_string(),
            ],
        },
        detail: DetailStrategy::OverviewOnly,
        classification: Some(ClassificationRule {
            disclosure_labels: vec!["responsible disclosure".to_string()],
            bounty_labels: vec!["bug bounty".to_string()],
            check: DisclosureCheck {
                section: Some(bounties_section()),
                ..notice_check()
            },
        }),
        pacing: Pacing::none(),
    }
}

fn notice_check() -> DisclosureCheck {
    DisclosureCheck {
        selectors: vec!["p.responsible-disclosure".to_string()],
        section: None,
        marker: DISCLOSURE_MARKER.to_string(),
    }
}

fn bounties_section() -> SectionRule {
    SectionRule {
        header: "div.detail-header".to_string(),
        label: "Bounties".to_string(),
        content_class: "detail-content".to_string(),
    }
}

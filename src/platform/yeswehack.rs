//! YesWeHack: program links scraped from one listing page, DOM reward grids

use super::{header, ProfileParts, Urls};
use crate::crawler::detail::{DetailStrategy, RewardGridSpec};
use crate::crawler::listing::{ItemMapping, ListingFormat, ListingSpec, LocatorRule};
use crate::crawler::Pacing;
use crate::session::ACCEPT_HTML;

pub(super) fn profile(urls: &Urls) -> ProfileParts {
    ProfileParts {
        bootstrap: None,
        headers: vec![
            header("Accept", ACCEPT_HTML),
            header("Accept-Language", "en-US,en;q=0.5"),
        ],
        listing: ListingSpec {
            page_url: format!("{}/programs?page={{page}}&resultsPerPage=74", urls.base),
            first_page_url: None,
            referer: None,
            accept: None,
            format: ListingFormat::Links {
                selector: "a[href*='/programs/']".to_string(),
                href_contains: "/programs/".to_string(),
                exclude_suffix: "/programs".to_string(),
            },
            max_pages: 1,
        },
        items: ItemMapping {
            name: "/name".to_string(),
            locator: LocatorRule::Path {
                pointer: "/href".to_string(),
            },
            handle: None,
            reward_summary: None,
            program_type: None,
            min_bounty: None,
            max_bounty: None,
            currency: Vec::new(),
        },
        detail: DetailStrategy::RewardGrid(RewardGridSpec {
            grid: "ywh-reward-grid".to_string(),
            title: "span.reward-grid-title".to_string(),
            value: "span.reward-grid-value".to_string(),
            amount: "span.tag-content".to_string(),
            tags: "div.d-flex.flex-wrap.mt-3.gap-3 span.tag-content".to_string(),
            bounty_tag: "bounty".to_string(),
        }),
        classification: None,
        pacing: Pacing::from_millis(1000, 0, 0),
    }
}

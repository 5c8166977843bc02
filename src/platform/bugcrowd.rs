//! Bugcrowd: CSRF-bootstrapped JSON listing, two-hop engagement briefs

use super::{header, ProfileParts, Urls};
use crate::crawler::detail::{DetailStrategy, TwoHopSpec};
use crate::crawler::listing::{ItemMapping, ListingFormat, ListingSpec, LocatorRule};
use crate::crawler::Pacing;
use crate::session::{BootstrapSpec, ACCEPT_JSON};

const LISTING_QUERY: &str = "category=bug_bounty&page={page}&sort_by=promoted&sort_direction=desc";

pub(super) fn profile(urls: &Urls) -> ProfileParts {
    ProfileParts {
        bootstrap: Some(BootstrapSpec {
            url: format!("{}/engagements", urls.base),
            meta_name: "csrf-token".to_string(),
            header_name: "x-csrf-token".to_string(),
        }),
        headers: vec![
            header("Accept", ACCEPT_JSON),
            header("sec-ch-ua-platform", "\"macOS\""),
            header(
                "sec-ch-ua",
                "\"Google Chrome\";v=\"137\", \"Chromium\";v=\"137\", \"Not/A)Brand\";v=\"24\"",
            ),
            header("sec-ch-ua-mobile", "?0"),
            header("Sec-Fetch-Site", "same-origin"),
            header("Sec-Fetch-Mode", "cors"),
            header("Sec-Fetch-Dest", "empty"),
            header("Accept-Language", "en-US,en;q=0.9"),
        ],
        listing: ListingSpec {
            page_url: format!("{}/engagements.json?{}", urls.base, LISTING_QUERY),
            first_page_url: None,
            referer: Some(format!("{}/engagements?{}", urls.base, LISTING_QUERY)),
            accept: None,
            format: ListingFormat::Json {
                pointer: "/engagements".to_string(),
            },
            max_pages: 9,
        },
        items: ItemMapping {
            name: "/name".to_string(),
            locator: LocatorRule::Path {
                pointer: "/briefUrl".to_string(),
            },
            handle: None,
            reward_summary: Some("/rewardSummary".to_string()),
            program_type: None,
            min_bounty: None,
            max_bounty: None,
            currency: Vec::new(),
        },
        detail: DetailStrategy::TwoHopJson(TwoHopSpec {
            selector: r#"div[data-react-class="ResearcherEngagementBrief"][data-api-endpoints]"#
                .to_string(),
            attribute: "data-api-endpoints".to_string(),
            path_pointer: "/engagementBriefApi/getBriefVersionDocument".to_string(),
            path_suffix: ".json".to_string(),
            referer: Some(format!("{}/engagements", urls.base)),
            scopes_pointer: "/data/scope".to_string(),
        }),
        classification: None,
        pacing: Pacing::from_millis(1200, 2500, 0).with_empty_page_delay(1500),
    }
}

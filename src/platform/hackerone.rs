//! HackerOne: single JSON search page, GraphQL bounty tables

use super::{header, ProfileParts, Urls};
use crate::crawler::detail::{DetailStrategy, GraphQlSpec, TEAM_PROFILE_QUERY};
use crate::crawler::listing::{ItemMapping, ListingFormat, ListingSpec, LocatorRule};
use crate::crawler::Pacing;
use crate::session::ACCEPT_JSON;

pub(super) fn profile(urls: &Urls) -> ProfileParts {
    ProfileParts {
        bootstrap: None,
        headers: vec![
            header("Accept", ACCEPT_JSON),
            header("Accept-Language", "en-US,en;q=0.9"),
            header("Sec-Fetch-Site", "same-origin"),
            header("Sec-Fetch-Mode", "cors"),
            header("Sec-Fetch-Dest", "empty"),
        ],
        listing: ListingSpec {
            page_url: format!(
                "{}/programs/search?query=bounties%3Ayes&sort=name%3Aascending&limit=1000",
                urls.base
            ),
            first_page_url: None,
            referer: None,
            accept: None,
            format: ListingFormat::Json {
                pointer: "/results".to_string(),
            },
            max_pages: 1,
        },
        items: ItemMapping {
            name: "/handle".to_string(),
            locator: LocatorRule::Path {
                pointer: "/url".to_string(),
            },
            handle: Some("/handle".to_string()),
            reward_summary: None,
            program_type: None,
            min_bounty: None,
            max_bounty: None,
            currency: Vec::new(),
        },
        detail: DetailStrategy::GraphQl(GraphQlSpec {
            endpoint: format!("{}/graphql", urls.base),
            operation_name: "TeamProfile".to_string(),
            query: TEAM_PROFILE_QUERY.to_string(),
            origin: Some(urls.base.clone()),
        }),
        classification: None,
        pacing: Pacing::from_millis(1000, 0, 0),
    }
}

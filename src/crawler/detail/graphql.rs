//! Query-style detail strategy
//!
//! Rewards come from a POSTed GraphQL `TeamProfile` query keyed by the
//! program handle. The bounty table has one row per scoped asset, each with
//! low/medium/high/critical amounts and their minimums.

use super::DetailOutcome;
use crate::crawler::fetcher::{post_json, ScrapeError};
use crate::extract::{pointer_str, ExtractionError};
use crate::model::{Amount, ListingItem, RewardRecord, SeverityAmount};
use crate::session::{Session, ACCEPT_JSON};
use serde_json::{json, Value};

/// Severity columns of a bounty table row
const SEVERITIES: [&str; 4] = ["low", "medium", "high", "critical"];

/// GraphQL document requesting a team's profile and bounty table
pub const TEAM_PROFILE_QUERY: &str = r#"query TeamProfile($handle: String!) {
  team(handle: $handle) {
    id
    handle
    state
    url
    type
    offers_bounties
    offers_thanks
    external_program {
      id
      offers_rewards
      __typename
    }
    ...BountyTable
    __typename
  }
}

fragment BountyTable on Team {
  id
  handle
  bounty_table {
    id
    low_label
    medium_label
    high_label
    critical_label
    description
    use_range
    bounty_table_rows(first: 100) {
      nodes {
        id
        low
        medium
        high
        critical
        low_minimum
        medium_minimum
        high_minimum
        critical_minimum
        smart_rewards_start_at
        structured_scope {
          id
          asset_identifier
          __typename
        }
        updated_at
        __typename
      }
      __typename
    }
    updated_at
    __typename
  }
  __typename
}
"#;

/// Endpoint and operation of the query API
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphQlSpec {
    /// Absolute endpoint URL
    pub endpoint: String,

    pub operation_name: String,
    pub query: String,

    /// `Origin` header sent with the query
    pub origin: Option<String>,
}

pub(super) async fn fetch(
    session: &Session,
    spec: &GraphQlSpec,
    item: &ListingItem,
) -> Result<DetailOutcome, ScrapeError> {
    let handle = item
        .handle
        .as_deref()
        .ok_or_else(|| ExtractionError::MissingField("handle".to_string()))?;

    let payload = json!({
        "operationName": spec.operation_name,
        "variables": {
            "handle": handle,
            "product_area": "team_profile",
            "product_feature": "overview",
        },
        "query": spec.query,
    });

    let mut overlay = vec![
        ("Accept", ACCEPT_JSON),
        ("Content-Type", "application/json"),
        ("X-Requested-With", "XMLHttpRequest"),
    ];
    if let Some(origin) = spec.origin.as_deref() {
        overlay.push(("Origin", origin));
    }

    let response = post_json(session, &spec.endpoint, &payload, &overlay).await?;
    parse_team(&response)
}

/// Reads the offers-bounties flag and bounty table rows from a response
pub fn parse_team(response: &Value) -> Result<DetailOutcome, ScrapeError> {
    let team = response
        .pointer("/data/team")
        .filter(|team| team.is_object())
        .ok_or_else(|| ExtractionError::MissingField("/data/team".to_string()))?;

    let offers_bounties_hint = Some(
        team.get("offers_bounties")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    );

    let rewards = match team.get("bounty_table").filter(|t| t.is_object()) {
        Some(table) => table
            .pointer("/bounty_table_rows/nodes")
            .and_then(Value::as_array)
            .map(|rows| rows.iter().map(|row| parse_row(table, row)).collect())
            .unwrap_or_default(),
        None => Vec::new(),
    };

    Ok(DetailOutcome {
        rewards,
        offers_bounties_hint,
        ..DetailOutcome::default()
    })
}

fn parse_row(table: &Value, row: &Value) -> RewardRecord {
    let tier = pointer_str(row, "/structured_scope/asset_identifier").unwrap_or("Default");

    let mut record = RewardRecord::new(tier);
    record.description = pointer_str(table, "/description").map(str::to_string);
    record.updated_at = pointer_str(row, "/updated_at").map(str::to_string);
    record.amounts = SEVERITIES
        .iter()
        .map(|severity| SeverityAmount {
            severity: pointer_str(table, &format!("/{}_label", severity))
                .unwrap_or(*severity)
                .to_string(),
            amount: row.get(*severity).and_then(Amount::from_json),
            minimum: row
                .get(format!("{}_minimum", severity))
                .and_then(Amount::from_json),
            raw: None,
        })
        .collect();

    record
}

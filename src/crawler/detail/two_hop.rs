//! Two-hop JSON detail strategy
//!
//! The detail HTML carries an attribute JSON naming the path of a second
//! JSON document; that document holds the reward scopes. Failing to find
//! the path is fatal for the item.

use super::DetailOutcome;
use crate::crawler::fetcher::{get_json, get_text, ScrapeError};
use crate::extract::{extract_attribute_json, pointer_str, ExtractionError};
use crate::model::{Amount, ListingItem, RewardRecord, SeverityAmount};
use crate::session::{Session, ACCEPT_HTML};
use serde_json::{Map, Value};
use url::Url;

/// Where the second resource is named and how its rewards are laid out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TwoHopSpec {
    /// Element carrying the attribute JSON
    pub selector: String,

    /// Attribute holding the JSON
    pub attribute: String,

    /// Pointer to the second resource's path within the attribute JSON
    pub path_pointer: String,

    /// Suffix appended to the path before fetching it
    pub path_suffix: String,

    /// Referer sent with the detail page request
    pub referer: Option<String>,

    /// Pointer to the scope array in the second resource
    pub scopes_pointer: String,
}

pub(super) async fn fetch(
    session: &Session,
    spec: &TwoHopSpec,
    base_url: &Url,
    item: &ListingItem,
) -> Result<DetailOutcome, ScrapeError> {
    tracing::info!("  Fetching details for program: {}", item.locator);

    let mut overlay = vec![("Accept", ACCEPT_HTML)];
    if let Some(referer) = spec.referer.as_deref() {
        overlay.push(("Referer", referer));
    }
    let page = get_text(session, &item.locator, &overlay).await?;

    let document_url = resolve_document_url(&page, spec, base_url)?;
    tracing::info!("    Fetching scope details from: {}", document_url);

    let details = get_json(session, &document_url, &[("Referer", item.locator.as_str())]).await?;

    let rewards = match details.pointer(&spec.scopes_pointer).and_then(Value::as_array) {
        Some(scopes) => parse_scopes(scopes),
        None => {
            tracing::warn!(
                "    '{}' not found in JSON from {}",
                spec.scopes_pointer,
                document_url
            );
            Vec::new()
        }
    };
    if rewards.is_empty() {
        tracing::info!("    No in-scope items with reward ranges for {}", item.locator);
    }

    Ok(DetailOutcome {
        rewards,
        page: Some(page),
        ..DetailOutcome::default()
    })
}

/// Reads the second resource's path from the page and makes it absolute
fn resolve_document_url(
    page: &str,
    spec: &TwoHopSpec,
    base_url: &Url,
) -> Result<String, ExtractionError> {
    let endpoints = extract_attribute_json(page, &spec.selector, &spec.attribute)?;
    let path = pointer_str(&endpoints, &spec.path_pointer)
        .ok_or_else(|| ExtractionError::MissingField(spec.path_pointer.clone()))?;

    base_url
        .join(&format!("{}{}", path, spec.path_suffix))
        .map(|url| url.to_string())
        .map_err(|e| ExtractionError::InvalidJson(format!("bad document path '{}': {}", path, e)))
}

/// Keeps in-scope entries that publish a reward range
fn parse_scopes(scopes: &[Value]) -> Vec<RewardRecord> {
    scopes
        .iter()
        .filter(|scope| is_truthy(scope.get("inScope")))
        .filter_map(|scope| {
            let range = scope.get("rewardRangeData").filter(|r| is_truthy(Some(r)))?;
            let name = scope
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Default");

            let mut record = RewardRecord::new(name);
            record.amounts = parse_range(range);
            record.raw = Some(range.clone());
            Some(record)
        })
        .collect()
}

/// Reads severity amounts from a reward range, keyed or positional
fn parse_range(range: &Value) -> Vec<SeverityAmount> {
    match range {
        Value::Object(map) => map
            .iter()
            .map(|(severity, bounds)| range_amount(severity.clone(), bounds))
            .collect(),
        Value::Array(entries) => entries
            .iter()
            .enumerate()
            .map(|(index, bounds)| {
                let severity = bounds
                    .get("name")
                    .or_else(|| bounds.get("priority"))
                    .map(label_of)
                    .unwrap_or_else(|| index.to_string());
                range_amount(severity, bounds)
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn range_amount(severity: String, bounds: &Value) -> SeverityAmount {
    match bounds {
        Value::Object(map) => SeverityAmount {
            severity,
            amount: bound(map, "max").or_else(|| bound(map, "min")),
            minimum: bound(map, "min"),
            raw: None,
        },
        other => SeverityAmount {
            severity,
            amount: Amount::from_json(other),
            minimum: None,
            raw: None,
        },
    }
}

fn bound(map: &Map<String, Value>, key: &str) -> Option<Amount> {
    map.get(key).and_then(Amount::from_json)
}

fn label_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

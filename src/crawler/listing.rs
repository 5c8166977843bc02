//! Paginated listing fetcher
//!
//! Walks page `1..=max_pages` of a platform's program index and turns each
//! page into raw item records, then maps raw records to `ListingItem`s.
//! Three listing formats are supported:
//! - JSON responses with the items under a known key
//! - HTML pages with the items in an embedded script payload
//! - HTML pages where each program is a link
//!
//! There is no "has next page" detection: the page count is fixed per
//! platform and may over- or under-fetch the true index.

use crate::crawler::fetcher::{decode_json, get_text, ScrapeError};
use crate::extract::{extract_embedded_json, parse_selector, pointer_str, ExtractionError};
use crate::model::{Amount, ListingItem, Overview};
use crate::session::Session;
use scraper::Html;
use serde_json::{json, Value};
use std::collections::HashSet;
use url::Url;

/// How items are laid out in a listing response
#[derive(Debug, Clone, PartialEq)]
pub enum ListingFormat {
    /// JSON body, items in the array at `pointer`
    Json { pointer: String },

    /// HTML body, items in the array at `pointer` of the JSON assigned after `anchor`
    Embedded { anchor: String, pointer: String },

    /// HTML body, one item per matching link
    Links {
        selector: String,
        href_contains: String,
        exclude_suffix: String,
    },
}

/// Where and how to fetch listing pages
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSpec {
    /// Page URL; `{page}` is replaced by the 1-based page index
    pub page_url: String,

    /// Distinct URL for page 1, if the platform uses one
    pub first_page_url: Option<String>,

    /// Referer sent with each listing request; `{page}` is substituted
    pub referer: Option<String>,

    /// Accept header for listing requests
    pub accept: Option<String>,

    pub format: ListingFormat,

    /// Fixed number of pages to walk
    pub max_pages: u32,
}

impl ListingSpec {
    /// Returns the URL of the given 1-based page
    pub fn url_for_page(&self, page: u32) -> String {
        match (&self.first_page_url, page) {
            (Some(first), 1) => first.clone(),
            _ => substitute_page(&self.page_url, page),
        }
    }

    /// Returns the Referer for the given page, if any
    pub fn referer_for_page(&self, page: u32) -> Option<String> {
        self.referer.as_ref().map(|r| substitute_page(r, page))
    }
}

/// How a locator is built from a raw listing record
#[derive(Debug, Clone, PartialEq)]
pub enum LocatorRule {
    /// A URL or path at `pointer`, resolved against the platform base URL
    Path { pointer: String },

    /// A URL template whose `{field}` placeholders are filled from the record
    Template { template: String },
}

/// Mapping from raw listing records to `ListingItem`s
///
/// All fields are JSON pointers into the raw record. `name` and the
/// locator are required; records missing either are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemMapping {
    pub name: String,
    pub locator: LocatorRule,
    pub handle: Option<String>,
    pub reward_summary: Option<String>,
    pub program_type: Option<String>,
    pub min_bounty: Option<String>,
    pub max_bounty: Option<String>,

    /// Currency pointers, tried in order
    pub currency: Vec<String>,
}

/// Fetches one listing page and returns its raw item records
///
/// # Arguments
///
/// * `session` - The run's session
/// * `spec` - The listing specification
/// * `base_url` - Base URL used to resolve relative links
/// * `page` - 1-based page index
///
/// # Returns
///
/// * `Ok(Vec<Value>)` - Raw records, possibly empty
/// * `Err(ScrapeError)` - Transport, status, decode or extraction failure;
///   the caller treats it as an empty page
pub async fn fetch_listing_page(
    session: &Session,
    spec: &ListingSpec,
    base_url: &Url,
    page: u32,
) -> Result<Vec<Value>, ScrapeError> {
    let url = spec.url_for_page(page);
    let referer = spec.referer_for_page(page);

    let mut overlay: Vec<(&str, &str)> = Vec::new();
    if let Some(referer) = referer.as_deref() {
        overlay.push(("Referer", referer));
    }
    if let Some(accept) = spec.accept.as_deref() {
        overlay.push(("Accept", accept));
    }

    tracing::info!("Fetching program list (page {}): {}", page, url);
    let body = get_text(session, &url, &overlay).await?;

    parse_listing(&url, &body, &spec.format, base_url)
}

/// Extracts raw item records from a listing body
///
/// Pure function of its input: parsing the same body twice yields the
/// same records in the same order.
pub fn parse_listing(
    url: &str,
    body: &str,
    format: &ListingFormat,
    base_url: &Url,
) -> Result<Vec<Value>, ScrapeError> {
    match format {
        ListingFormat::Json { pointer } => {
            let value = decode_json(url, body)?;
            Ok(array_at(&value, pointer)?)
        }
        ListingFormat::Embedded { anchor, pointer } => {
            let value = extract_embedded_json(body, anchor)?;
            Ok(array_at(&value, pointer)?)
        }
        ListingFormat::Links {
            selector,
            href_contains,
            exclude_suffix,
        } => Ok(extract_link_records(
            body,
            selector,
            href_contains,
            exclude_suffix,
            base_url,
        )?),
    }
}

fn array_at(value: &Value, pointer: &str) -> Result<Vec<Value>, ExtractionError> {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| ExtractionError::MissingField(pointer.to_string()))
}

/// Turns matching links into `{"href", "name"}` records, first occurrence wins
fn extract_link_records(
    body: &str,
    selector: &str,
    href_contains: &str,
    exclude_suffix: &str,
    base_url: &Url,
) -> Result<Vec<Value>, ExtractionError> {
    let parsed = parse_selector(selector)?;
    let document = Html::parse_document(body);

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for element in document.select(&parsed) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !href.contains(href_contains) || href.ends_with(exclude_suffix) {
            continue;
        }
        let Ok(absolute) = base_url.join(href) else {
            continue;
        };

        let absolute = absolute.to_string();
        if !seen.insert(absolute.clone()) {
            continue;
        }

        let name = absolute
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        records.push(json!({ "href": absolute, "name": name }));
    }

    Ok(records)
}

/// Maps a raw record to a `ListingItem`
///
/// # Returns
///
/// * `Some(ListingItem)` - The record has a name and a resolvable locator
/// * `None` - The record is malformed and must be skipped
pub fn map_item(raw: &Value, mapping: &ItemMapping, base_url: &Url) -> Option<ListingItem> {
    let name = pointer_str(raw, &mapping.name)?.to_string();

    let locator = match &mapping.locator {
        LocatorRule::Path { pointer } => {
            let path = pointer_str(raw, pointer)?;
            base_url.join(path).ok()?.to_string()
        }
        LocatorRule::Template { template } => {
            render_template(template, |field| field_as_string(raw, field))?
        }
    };

    let lookup_amount = |pointer: &Option<String>| {
        pointer
            .as_deref()
            .and_then(|p| raw.pointer(p))
            .and_then(Amount::from_json)
    };

    let overview = Overview {
        program_type: mapping
            .program_type
            .as_deref()
            .and_then(|p| pointer_str(raw, p))
            .map(str::to_string),
        min_bounty: lookup_amount(&mapping.min_bounty),
        max_bounty: lookup_amount(&mapping.max_bounty),
        currency: mapping
            .currency
            .iter()
            .find_map(|p| pointer_str(raw, p))
            .map(str::to_string),
    };

    Some(ListingItem {
        name,
        locator,
        handle: mapping
            .handle
            .as_deref()
            .and_then(|p| pointer_str(raw, p))
            .map(str::to_string),
        reward_summary: mapping
            .reward_summary
            .as_deref()
            .and_then(|p| raw.pointer(p))
            .filter(|v| !v.is_null())
            .cloned(),
        overview,
    })
}

/// Fills `{name}` placeholders; `None` if any placeholder cannot be filled
pub fn render_template(
    template: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let close = rest[open..].find('}')? + open;
        rendered.push_str(&rest[..open]);
        rendered.push_str(&lookup(&rest[open + 1..close])?);
        rest = &rest[close + 1..];
    }
    rendered.push_str(rest);

    Some(rendered)
}

fn substitute_page(template: &str, page: u32) -> String {
    template.replace("{page}", &page.to_string())
}

fn field_as_string(raw: &Value, field: &str) -> Option<String> {
    match raw.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

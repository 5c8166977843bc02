//! Attribute-embedded JSON and meta-tag lookups

use super::ExtractionError;
use scraper::{Html, Selector};
use serde_json::Value;

/// Parses a CSS selector, mapping failures into `ExtractionError`
pub fn parse_selector(selector: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|_| ExtractionError::InvalidSelector(selector.to_string()))
}

/// Reads `attribute` of the first element matching `selector` and parses it as JSON
///
/// # Errors
///
/// * `ElementNotFound` - No element matches the selector
/// * `AttributeMissing` - The attribute is absent or empty
/// * `InvalidJson` - The attribute value is not valid JSON
///
/// # Example
///
/// ```
/// use bounty_harvest::extract::extract_attribute_json;
///
/// let html = r#"<div data-react-class="Brief" data-api-endpoints='{"a": 1}'></div>"#;
/// let value = extract_attribute_json(
///     html,
///     r#"div[data-react-class="Brief"][data-api-endpoints]"#,
///     "data-api-endpoints",
/// )
/// .unwrap();
/// assert_eq!(value["a"], 1);
/// ```
pub fn extract_attribute_json(
    html: &str,
    selector: &str,
    attribute: &str,
) -> Result<Value, ExtractionError> {
    let parsed = parse_selector(selector)?;
    let document = Html::parse_document(html);

    let element = document
        .select(&parsed)
        .next()
        .ok_or_else(|| ExtractionError::ElementNotFound(selector.to_string()))?;

    let raw = element
        .value()
        .attr(attribute)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ExtractionError::AttributeMissing {
            selector: selector.to_string(),
            attribute: attribute.to_string(),
        })?;

    serde_json::from_str(raw).map_err(|e| ExtractionError::InvalidJson(e.to_string()))
}

/// Returns the `content` of `<meta name="{name}">`, if present and non-empty
pub fn extract_meta_content(html: &str, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[name="{}"]"#, name)).ok()?;
    let document = Html::parse_document(html);

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

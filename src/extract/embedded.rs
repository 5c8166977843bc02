//! Balanced-brace extraction of JSON embedded in HTML or script text
//!
//! Pages built with client-side frameworks ship their initial state as a
//! script assignment such as
//! `window[Symbol.for("InstantSearchInitialResults")] = {...};`. The payload
//! is located by anchor, delimited by counting braces, then parsed strictly.
//!
//! # Known limitation
//!
//! The scanner counts every `{` and `}` byte, including those inside JSON
//! string literals. A string value containing an unmatched brace shifts the
//! end offset and the extraction fails with `InvalidJson` or `Unbalanced`.
//! The payloads this crate targets do not carry such strings.

use super::ExtractionError;
use serde_json::Value;

/// Separators accepted between the anchor and the payload.
const SEPARATORS: [char; 2] = ['=', ':'];

/// Extracts the JSON object embedded after `anchor`
///
/// # Algorithm
///
/// 1. Locate the first occurrence of `anchor`
/// 2. Skip past the first `=` (or `:`) following it, if any
/// 3. Locate the first `{` from there
/// 4. Scan forward counting braces until the count returns to zero
/// 5. Parse the delimited text as JSON
///
/// # Example
///
/// ```
/// use bounty_harvest::extract::extract_embedded_json;
///
/// let html = r#"<script>window.__STATE__ = {"hits": [1, 2]};</script>"#;
/// let value = extract_embedded_json(html, "window.__STATE__").unwrap();
/// assert_eq!(value["hits"][1], 2);
/// ```
pub fn extract_embedded_json(document: &str, anchor: &str) -> Result<Value, ExtractionError> {
    let anchor_start = document
        .find(anchor)
        .ok_or_else(|| ExtractionError::AnchorNotFound(anchor.to_string()))?;
    let after_anchor = anchor_start + anchor.len();

    let search_from = match document[after_anchor..].find(SEPARATORS) {
        Some(offset) => after_anchor + offset + 1,
        None => after_anchor,
    };

    let start = document[search_from..]
        .find('{')
        .map(|offset| search_from + offset)
        .ok_or_else(|| ExtractionError::NoOpeningBrace(anchor.to_string()))?;

    let end = find_balanced_end(document, start).ok_or(ExtractionError::Unbalanced(start))?;

    serde_json::from_str(&document[start..=end])
        .map_err(|e| ExtractionError::InvalidJson(e.to_string()))
}

/// Returns the offset of the `}` closing the `{` at `start`
///
/// The count starts at one for the opening brace; the first position where
/// it returns to zero is the end. Returns `None` if `start` is not a `{` or
/// the document ends first.
pub fn find_balanced_end(document: &str, start: usize) -> Option<usize> {
    let bytes = document.as_bytes();
    if bytes.get(start).copied()? != b'{' {
        return None;
    }

    let mut depth = 1usize;
    for (offset, &b) in bytes[start + 1..].iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + 1 + offset);
                }
            }
            _ => {}
        }
    }
    None
}

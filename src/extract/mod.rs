//! Payload extraction from non-JSON documents
//!
//! This module contains the parsing building blocks used by the listing and
//! detail stages:
//! - Balanced-brace extraction of JSON assigned inside inline scripts
//! - JSON embedded in an element attribute, located by CSS selector
//! - Normalization of human-formatted reward amounts

mod amount;
mod attribute;
mod embedded;

pub use amount::{clean_bounty_value, leading_number, parse_cell_amount};
pub use attribute::{extract_attribute_json, extract_meta_content, parse_selector};
pub use embedded::{extract_embedded_json, find_balanced_end};

use serde_json::Value;
use thiserror::Error;

/// Errors raised while locating or decoding an embedded payload
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("anchor '{0}' not found in document")]
    AnchorNotFound(String),

    #[error("no opening brace after anchor '{0}'")]
    NoOpeningBrace(String),

    #[error("unbalanced braces starting at offset {0}")]
    Unbalanced(usize),

    #[error("embedded payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("no element matches '{0}'")]
    ElementNotFound(String),

    #[error("attribute '{attribute}' missing or empty on '{selector}'")]
    AttributeMissing { selector: String, attribute: String },

    #[error("field '{0}' missing from payload")]
    MissingField(String),
}

/// Looks up a JSON pointer and returns it as a non-empty string
pub fn pointer_str<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

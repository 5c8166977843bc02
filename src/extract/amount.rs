//! Normalization of human-formatted reward amounts
//!
//! Platforms print amounts such as `€1.500`, `$2,000`, `500 - 1,000 USD` or
//! `12.5`. A `.` followed by exactly three digits is a thousands separator,
//! otherwise it is a decimal point.

use crate::model::Amount;
use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\d,]+(?:\.\d+)?").expect("valid leading number pattern"));

/// Converts a formatted amount into a number
///
/// # Rules
///
/// 1. Drop every character that is not an ASCII digit or `.`
/// 2. More than one `.`, or a single `.` followed by exactly three digits:
///    the dots are thousands separators, remove them and read an integer
/// 3. A single `.` otherwise: read a decimal
/// 4. No `.`: read an integer
///
/// Returns `None` when nothing numeric remains.
///
/// # Example
///
/// ```
/// use bounty_harvest::extract::clean_bounty_value;
/// use bounty_harvest::Amount;
///
/// assert_eq!(clean_bounty_value("€1.500"), Some(Amount::Integer(1500)));
/// assert_eq!(clean_bounty_value("$2,000"), Some(Amount::Integer(2000)));
/// assert_eq!(clean_bounty_value("12.5"), Some(Amount::Decimal(12.5)));
/// ```
pub fn clean_bounty_value(raw: &str) -> Option<Amount> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let dots = cleaned.matches('.').count();
    if dots == 0 {
        return cleaned.parse::<i64>().ok().map(Amount::Integer);
    }

    let thousands_separated = dots > 1
        || cleaned
            .split_once('.')
            .map(|(_, fraction)| fraction.len() == 3)
            .unwrap_or(false);

    if thousands_separated {
        cleaned.replace('.', "").parse::<i64>().ok().map(Amount::Integer)
    } else {
        cleaned.parse::<f64>().ok().map(Amount::Decimal)
    }
}

/// Returns the first number-like run (`1,500` or `12.50`) in `text`
pub fn leading_number(text: &str) -> Option<&str> {
    LEADING_NUMBER.find(text).map(|m| m.as_str())
}

/// Parses a table cell: the first number in the text, else the whole text
///
/// The number may sit anywhere in the cell, not only at its start, so
/// `Up to €500 - €1,000` reads 500 instead of falling back to the whole
/// text (which would concatenate both figures).
pub fn parse_cell_amount(text: &str) -> Option<Amount> {
    match leading_number(text) {
        Some(number) => clean_bounty_value(number),
        None => clean_bounty_value(text),
    }
}

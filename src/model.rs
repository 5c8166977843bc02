//! Data model shared by the listing, detail and output stages
//!
//! `ListingItem` is produced by the listing fetcher, `RewardRecord` only by
//! the detail enricher, and `ProgramResult` is the unit written to the run
//! artifact.

use crate::extract::clean_bounty_value;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A reward figure as published by a platform
///
/// Serialized untagged so the artifact carries plain JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Integer(i64),
    Decimal(f64),
}

impl Amount {
    /// Reads an amount from a JSON value
    ///
    /// Numbers are taken as-is, strings go through `clean_bounty_value`, and
    /// currency-tagged objects (`{"value": 500, "currency": "EUR"}`) yield
    /// their `value`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(Amount::Integer)
                .or_else(|| n.as_f64().map(Amount::Decimal)),
            Value::String(s) => clean_bounty_value(s),
            Value::Object(map) => map.get("value").and_then(Amount::from_json),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Amount::Integer(i) => i as f64,
            Amount::Decimal(d) => d,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.as_f64() > 0.0
    }

    pub fn zero() -> Self {
        Amount::Integer(0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Integer(i) => write!(f, "{}", i),
            Amount::Decimal(d) => write!(f, "{}", d),
        }
    }
}

/// Coarse reward metadata published on the listing itself
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overview {
    /// Raw program type label (e.g. "Bug bounty", "Responsible disclosure")
    pub program_type: Option<String>,
    pub min_bounty: Option<Amount>,
    pub max_bounty: Option<Amount>,
    pub currency: Option<String>,
}

/// One row of a paginated program index, not yet enriched
#[derive(Debug, Clone, PartialEq)]
pub struct ListingItem {
    /// Display name of the program
    pub name: String,

    /// Absolute URL of the program's detail resource
    pub locator: String,

    /// Platform handle, used by query-style detail APIs
    pub handle: Option<String>,

    /// Raw reward summary from the listing payload
    pub reward_summary: Option<Value>,

    pub overview: Overview,
}

/// The reward for a single severity within a tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityAmount {
    /// Severity label as displayed by the platform
    pub severity: String,

    pub amount: Option<Amount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Amount>,

    /// Text the amount was parsed from, when it came from a page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// One reward tier (table row, scope, or grid) of a program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardRecord {
    /// Tier label (scope name, tier name, or "Default")
    pub tier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Severity amounts in source document order
    pub amounts: Vec<SeverityAmount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Source payload kept when its shape is platform-defined
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl RewardRecord {
    pub fn new(tier: impl Into<String>) -> Self {
        Self {
            tier: tier.into(),
            currency: None,
            amounts: Vec::new(),
            description: None,
            updated_at: None,
            raw: None,
        }
    }

    /// Returns true if any severity in this tier pays more than zero
    pub fn has_positive_amount(&self) -> bool {
        self.amounts
            .iter()
            .filter_map(|a| a.amount)
            .any(|a| a.is_positive())
    }
}

/// The unit of output: one per attempted listing item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramResult {
    pub platform: String,
    pub program_name: String,
    pub program_url: String,

    /// The program pays monetary rewards
    pub offers_bounties: bool,

    /// The program is a disclosure-only / VDP program
    pub disclosure_only: bool,

    /// The detail resource could not be located or read
    pub no_data_found: bool,

    pub min_bounty: Option<Amount>,
    pub max_bounty: Option<Amount>,
    pub currency: Option<String>,
    pub program_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_summary: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Reward tiers in source document order; empty is a valid answer
    pub rewards: Vec<RewardRecord>,

    /// Item-scoped failure that degraded this result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

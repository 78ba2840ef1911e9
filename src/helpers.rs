//! Helper analysis payloads.
//!
//! Each task carries a map from helper name to a JSON payload whose shape depends
//! on the helper. [`HelperContent::from_value`] resolves the name to one of the
//! known shapes, falling back to [`HelperContent::Opaque`] for anything else.
//!
//! The analysis step answers in simple line formats; the `parse_*` functions
//! turn those raw responses into payloads.

use crate::models::Quote;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

pub const SUMMARIZE: &str = "summarize";
pub const COMPARE: &str = "compare";
pub const CRITERIA_QUOTES: &str = "criteria_quotes";
pub const DEBATE: &str = "debate";

/// Helper tabs and the helpers listed under each, in display order.
pub const HELPER_TABS: &[(&str, &[&str])] = &[
    ("Summary", &[SUMMARIZE, COMPARE]),
    ("Criteria", &[CRITERIA_QUOTES]),
    ("Debate", &[DEBATE]),
];

/// Quotes for each side, keyed by side label ("Text A", "Text B").
pub type SideQuotes = BTreeMap<String, Vec<Quote>>;

/// Side quotes keyed by criterion short name.
pub type CriteriaQuotes = BTreeMap<String, SideQuotes>;

/// Output of the `summarize` helper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
}

/// One axis of difference from the `compare` helper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareItem {
    pub feature: String,
    pub a: String,
    pub b: String,
}

/// Known helper types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperKind {
    Summarize,
    Compare,
    CriteriaQuotes,
    Other(String),
}

impl HelperKind {
    /// Resolve a helper name, ignoring case.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            SUMMARIZE => HelperKind::Summarize,
            COMPARE => HelperKind::Compare,
            CRITERIA_QUOTES => HelperKind::CriteriaQuotes,
            _ => HelperKind::Other(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HelperKind::Summarize => SUMMARIZE,
            HelperKind::Compare => COMPARE,
            HelperKind::CriteriaQuotes => CRITERIA_QUOTES,
            HelperKind::Other(name) => name,
        }
    }
}

/// A decoded helper payload.
#[derive(Debug, Clone, PartialEq)]
pub enum HelperContent {
    Summarize(Summary),
    Compare(Vec<CompareItem>),
    CriteriaQuotes(CriteriaQuotes),
    /// Unknown helper, or a known helper whose payload has an unexpected shape.
    Opaque(Value),
}

impl HelperContent {
    pub fn from_value(helper_name: &str, value: &Value) -> Self {
        let kind = HelperKind::from_name(helper_name);
        let decoded = match kind {
            HelperKind::Summarize => {
                serde_json::from_value(value.clone()).map(HelperContent::Summarize)
            }
            HelperKind::Compare => serde_json::from_value(value.clone()).map(HelperContent::Compare),
            HelperKind::CriteriaQuotes => {
                serde_json::from_value(value.clone()).map(HelperContent::CriteriaQuotes)
            }
            HelperKind::Other(_) => return HelperContent::Opaque(value.clone()),
        };

        decoded.unwrap_or_else(|e| {
            warn!(helper = kind.as_str(), error = %e, "helper payload has unexpected shape");
            HelperContent::Opaque(value.clone())
        })
    }

    pub fn to_value(&self) -> Value {
        // Serializing these plain maps, vectors and strings cannot fail.
        match self {
            HelperContent::Summarize(s) => serde_json::to_value(s).unwrap_or(Value::Null),
            HelperContent::Compare(items) => serde_json::to_value(items).unwrap_or(Value::Null),
            HelperContent::CriteriaQuotes(c) => serde_json::to_value(c).unwrap_or(Value::Null),
            HelperContent::Opaque(v) => v.clone(),
        }
    }

    pub fn as_criteria_quotes(&self) -> Option<&CriteriaQuotes> {
        match self {
            HelperContent::CriteriaQuotes(c) => Some(c),
            _ => None,
        }
    }
}

/// Name of the tab a helper is shown under.
pub fn helper_tab(helper_name: &str) -> Option<&'static str> {
    HELPER_TABS
        .iter()
        .find(|(_, helpers)| helpers.contains(&helper_name))
        .map(|(tab, _)| *tab)
}

/// Short name of a criterion: the text between the first pair of `**` marks.
pub fn criterion_short_name(criterion: &str) -> Option<&str> {
    criterion.split("**").nth(1).map(str::trim)
}

/// Parse `FEATURE: / A: / B:` line triples from a raw comparison response.
pub fn parse_comparison_points(raw: &str) -> Vec<CompareItem> {
    let lines: Vec<&str> = raw.split('\n').collect();

    lines
        .windows(3)
        .filter_map(|w| {
            let feature = w[0].strip_prefix("FEATURE: ")?;
            let a = w[1].strip_prefix("A: ")?;
            let b = w[2].strip_prefix("B: ")?;
            Some(CompareItem {
                feature: feature.trim().to_string(),
                a: a.trim().to_string(),
                b: b.trim().to_string(),
            })
        })
        .collect()
}

/// Parse `QUOTE:` lines, each optionally followed by a `COMMENT:` line.
///
/// A comment attaches to the most recent quote; a later comment replaces it.
pub fn parse_quotes(raw: &str) -> Vec<Quote> {
    let mut quotes: Vec<Quote> = Vec::new();

    for line in raw.split('\n') {
        if let Some(quote) = line.strip_prefix("QUOTE: ") {
            quotes.push(Quote::new(quote.trim()));
        } else if let Some(comment) = line.strip_prefix("COMMENT: ") {
            if let Some(last) = quotes.last_mut() {
                last.comment = Some(comment.trim().to_string());
            }
        }
    }

    quotes
}

//! Date-range string normalization for rate periods.
//!
//! Rate periods were typed by hand ("Jan. - Mar", "15 sept - 30 oct",
//! "Dec./Feb"). Abbreviated month names, French or English, are rewritten to
//! full French month names and whitespace is collapsed.
//!
//! Every pattern is word-bounded and matches an abbreviation only, never a
//! full month name, so no rule can match the text another rule produced.

use crate::error::TransformResult;
use crate::rules::RuleTable;
use crate::transform::{FieldChanges, Transform};
use pw_core::{Document, FieldPath};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Month abbreviation patterns and their replacements, in application order.
const MONTH_RULES: &[(&str, &str)] = &[
    (r"(?i)\b(?:janv|jan)\b\.?", "janvier"),
    (r"(?i)\b(?:f[ée]vr|f[ée]v|feb)\b\.?", "février"),
    (r"(?i)\bmar\b\.?", "mars"),
    (r"(?i)\b(?:avr|apr)\b\.?", "avril"),
    (r"(?i)\bmay\b\.?", "mai"),
    (r"(?i)\bjun\b\.?", "juin"),
    (r"(?i)\b(?:juil|jul)\b\.?", "juillet"),
    (r"(?i)\b(?:ao[uû]|aug)\b\.?", "août"),
    (r"(?i)\b(?:sept|sep)\b\.?", "septembre"),
    (r"(?i)\boct\b\.?", "octobre"),
    (r"(?i)\bnov\b\.?", "novembre"),
    (r"(?i)\bd[ée]c\b\.?", "décembre"),
];

static MONTH_TABLE: OnceLock<RuleTable<Regex, &'static str>> = OnceLock::new();
static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

/// Compiled month rules
pub fn month_rules() -> &'static RuleTable<Regex, &'static str> {
    MONTH_TABLE.get_or_init(|| {
        MONTH_RULES
            .iter()
            .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid regex"), *replacement))
            .collect()
    })
}

fn whitespace_regex() -> &'static Regex {
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Apply every month rule in table order, then collapse whitespace and trim.
pub fn normalize_period(input: &str) -> String {
    let mut text = input.to_string();
    for (pattern, replacement) in month_rules().entries() {
        if pattern.is_match(&text) {
            text = pattern.replace_all(&text, *replacement).into_owned();
        }
    }
    whitespace_regex().replace_all(&text, " ").trim().to_string()
}

/// Rewrites a period string (or each locale of a localized period) in place.
pub struct DateNormalization {
    field: FieldPath,
}

impl DateNormalization {
    pub fn new(field: FieldPath) -> Self {
        Self { field }
    }
}

impl Transform for DateNormalization {
    fn name(&self) -> &str {
        "date-normalization"
    }

    fn compute(&self, doc: &Document) -> TransformResult<FieldChanges> {
        let Some(current) = doc.get(&self.field) else {
            return Ok(FieldChanges::new());
        };

        let normalized = match current {
            Value::String(s) => Value::String(normalize_period(s)),
            Value::Object(locales) => {
                let mut out = Map::new();
                for (locale, value) in locales {
                    let value = match value {
                        Value::String(s) => Value::String(normalize_period(s)),
                        other => other.clone(),
                    };
                    out.insert(locale.clone(), value);
                }
                Value::Object(out)
            }
            _ => {
                log::debug!("{}: '{}' is not text, leaving it", doc.id, self.field);
                return Ok(FieldChanges::new());
            }
        };

        if normalized == *current {
            Ok(FieldChanges::new())
        } else {
            Ok(FieldChanges::new().set(self.field.clone(), normalized))
        }
    }
}

#[cfg(test)]
#[path = "dates_test.rs"]
mod tests;

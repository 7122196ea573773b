//! Locale normalization: collapse the many spellings editors used for a
//! language ("FR", "fr_FR", "Français", "english") to the site's locale codes.

use crate::error::TransformResult;
use crate::rules::RuleTable;
use crate::transform::{FieldChanges, Transform};
use pw_core::{Document, FieldPath};
use serde_json::Value;

const FRENCH: &[&str] = &[
    "fr", "fr-fr", "fr_fr", "fra", "fre", "français", "francais", "french",
];
const ENGLISH: &[&str] = &[
    "en", "en-gb", "en_gb", "en-us", "en_us", "eng", "anglais", "english",
];

/// Spellings per canonical locale, matched case-insensitively after trimming.
pub fn default_locales() -> RuleTable<&'static [&'static str], &'static str> {
    RuleTable::new(vec![(FRENCH, "fr"), (ENGLISH, "en")])
}

/// Canonical code for a locale spelling, or `None` when unknown.
pub fn canonical_locale(
    table: &RuleTable<&'static [&'static str], &'static str>,
    value: &str,
) -> Option<&'static str> {
    let value = value.trim().to_lowercase();
    table
        .first_match(|spellings| spellings.iter().any(|s| *s == value))
        .copied()
}

/// Rewrites a locale field (string, or array of strings) to canonical codes.
/// Unknown spellings are left as they are.
pub struct LocaleNormalization {
    field: FieldPath,
    locales: RuleTable<&'static [&'static str], &'static str>,
}

impl LocaleNormalization {
    pub fn new(field: FieldPath) -> Self {
        Self {
            field,
            locales: default_locales(),
        }
    }

    fn normalize(&self, value: &str) -> Value {
        match canonical_locale(&self.locales, value) {
            Some(code) => Value::String(code.to_string()),
            None => Value::String(value.to_string()),
        }
    }
}

impl Transform for LocaleNormalization {
    fn name(&self) -> &str {
        "locale-normalization"
    }

    fn compute(&self, doc: &Document) -> TransformResult<FieldChanges> {
        let Some(current) = doc.get(&self.field) else {
            return Ok(FieldChanges::new());
        };

        let normalized = match current {
            Value::String(s) => self.normalize(s),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => self.normalize(s),
                        other => other.clone(),
                    })
                    .collect(),
            ),
            _ => return Ok(FieldChanges::new()),
        };

        if normalized == *current {
            return Ok(FieldChanges::new());
        }
        log::debug!("{}: {} -> {}", doc.id, current, normalized);
        Ok(FieldChanges::new().set(self.field.clone(), normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pw_core::{DocumentId, DocumentType};
    use serde_json::json;

    fn villa(language: Value) -> Document {
        Document::new(
            DocumentId::try_new("villa-1").unwrap(),
            DocumentType::try_new("villa").unwrap(),
        )
        .with_field("language", language)
    }

    fn language() -> FieldPath {
        FieldPath::parse("language").unwrap()
    }

    #[test]
    fn test_canonical_locale() {
        let table = default_locales();
        assert_eq!(canonical_locale(&table, "FR"), Some("fr"));
        assert_eq!(canonical_locale(&table, " fr_FR "), Some("fr"));
        assert_eq!(canonical_locale(&table, "Français"), Some("fr"));
        assert_eq!(canonical_locale(&table, "en-US"), Some("en"));
        assert_eq!(canonical_locale(&table, "Anglais"), Some("en"));
        assert_eq!(canonical_locale(&table, "it"), None);
    }

    #[test]
    fn test_compute_string() {
        let t = LocaleNormalization::new(language());
        let changes = t.compute(&villa(json!("French"))).unwrap();
        assert_eq!(changes.set, vec![(language(), json!("fr"))]);
        assert!(t.compute(&villa(json!("fr"))).unwrap().is_empty());
        assert!(t.compute(&villa(json!("Italiano"))).unwrap().is_empty());
    }

    #[test]
    fn test_compute_array() {
        let t = LocaleNormalization::new(language());
        let changes = t.compute(&villa(json!(["FR", "english", "de"]))).unwrap();
        assert_eq!(changes.set, vec![(language(), json!(["fr", "en", "de"]))]);
    }

    #[test]
    fn test_already_normalized_is_noop() {
        let t = LocaleNormalization::new(language());
        let mut doc = villa(json!(["fr_FR", "EN"]));
        t.compute(&doc).unwrap().apply_to(&mut doc).unwrap();
        assert!(t.compute(&doc).unwrap().is_empty());
    }
}

//! Dotted field paths (`privateInfo.address`) into a document's fields.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated, dotted path to a (possibly nested) document field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    raw: String,
}

impl FieldPath {
    /// Parse a dotted path. Every segment must be a plain identifier.
    pub fn parse(path: &str) -> CoreResult<Self> {
        if path.is_empty() {
            return Err(CoreError::InvalidFieldPath {
                path: path.to_string(),
                reason: "path is empty".to_string(),
            });
        }

        for segment in path.split('.') {
            if segment.is_empty() {
                return Err(CoreError::InvalidFieldPath {
                    path: path.to_string(),
                    reason: "empty segment".to_string(),
                });
            }
            let mut chars = segment.chars();
            let first_ok = chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
            if !first_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(CoreError::InvalidFieldPath {
                    path: path.to_string(),
                    reason: format!("'{segment}' is not a valid field name"),
                });
            }
        }

        Ok(Self {
            raw: path.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw.split('.')
    }

    /// Top-level fields with a leading underscore belong to the store.
    pub fn is_system(&self) -> bool {
        self.raw.starts_with('_')
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        FieldPath::parse(&s)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = CoreError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        FieldPath::parse(s)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.raw
    }
}

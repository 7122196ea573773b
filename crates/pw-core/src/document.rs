//! Content documents as returned by the store.

use crate::error::{CoreError, CoreResult};
use crate::field_path::FieldPath;
use crate::ids::{DocumentId, DocumentType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Locales the site publishes in, in fallback order for display names.
pub const SITE_LOCALES: &[&str] = &["fr", "en"];

/// A single record in the content store.
///
/// System fields other than `_id`, `_type`, and `_rev` (for example
/// `_createdAt`) stay in `fields` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: DocumentId,

    #[serde(rename = "_type")]
    pub doc_type: DocumentType,

    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Create an empty document of the given identity and type.
    pub fn new(id: DocumentId, doc_type: DocumentType) -> Self {
        Self {
            id,
            doc_type,
            rev: None,
            fields: Map::new(),
        }
    }

    /// Decode a raw JSON record.
    pub fn from_value(value: Value) -> CoreResult<Self> {
        serde_json::from_value(value).map_err(|e| CoreError::InvalidDocument {
            message: e.to_string(),
        })
    }

    pub fn to_value(&self) -> CoreResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Builder-style field setter used by fixtures and imports.
    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Look up a field. `null` counts as undefined, as in the store's
    /// `defined()` function.
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        let mut segments = path.segments();
        let first = segments.next()?;
        let mut current = self.fields.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }

    pub fn is_defined(&self, path: &FieldPath) -> bool {
        self.get(path).is_some()
    }

    /// Read a string field, resolving localized objects (`{fr, en}`) to the
    /// first site locale that has a value.
    pub fn text(&self, path: &FieldPath) -> Option<&str> {
        match self.get(path)? {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => SITE_LOCALES
                .iter()
                .find_map(|locale| map.get(*locale).and_then(Value::as_str)),
            _ => None,
        }
    }

    /// Human-readable name for progress output.
    pub fn display_name(&self) -> String {
        ["name", "title"]
            .iter()
            .filter_map(|field| FieldPath::parse(field).ok())
            .find_map(|path| self.text(&path).map(str::to_string))
            .unwrap_or_else(|| self.id.to_string())
    }

    /// Set a field, creating intermediate objects as needed.
    pub fn set(&mut self, path: &FieldPath, value: Value) -> CoreResult<()> {
        let segments: Vec<&str> = path.segments().collect();
        let Some((last, parents)) = segments.split_last() else {
            return Err(CoreError::InvalidFieldPath {
                path: path.to_string(),
                reason: "path is empty".to_string(),
            });
        };

        let mut current = &mut self.fields;
        for segment in parents {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if entry.is_null() {
                *entry = Value::Object(Map::new());
            }
            current = match entry {
                Value::Object(map) => map,
                _ => {
                    return Err(CoreError::PatchConflict {
                        document_id: self.id.to_string(),
                        field: path.to_string(),
                        reason: format!("'{segment}' is not an object"),
                    })
                }
            };
        }
        current.insert(last.to_string(), value);
        Ok(())
    }

    /// Remove a field. Missing parents are not an error.
    pub fn unset(&mut self, path: &FieldPath) {
        let segments: Vec<&str> = path.segments().collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut current = &mut self.fields;
        for segment in parents {
            match current.get_mut(*segment) {
                Some(Value::Object(map)) => current = map,
                _ => return,
            }
        }
        current.remove(*last);
    }
}

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;

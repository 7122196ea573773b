//! Structural field transforms: backfill, removal, relocation, geopoint
//! composition, and chaining several transforms over one document.

use crate::error::{TransformError, TransformResult};
use crate::transform::{FieldChanges, Transform};
use pw_core::{Document, FieldPath};
use serde_json::{json, Value};

type ComputeFn = dyn Fn(&Document) -> Option<Value> + Send + Sync;

enum BackfillValue {
    Constant(Value),
    Computed(Box<ComputeFn>),
}

/// Writes a value into a field only where the field is undefined.
pub struct Backfill {
    field: FieldPath,
    value: BackfillValue,
}

impl Backfill {
    pub fn constant(field: FieldPath, value: Value) -> Self {
        Self {
            field,
            value: BackfillValue::Constant(value),
        }
    }

    /// Backfill with a value derived from the document. Returning `None`
    /// leaves the document alone.
    pub fn computed<F>(field: FieldPath, compute: F) -> Self
    where
        F: Fn(&Document) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            field,
            value: BackfillValue::Computed(Box::new(compute)),
        }
    }
}

impl Transform for Backfill {
    fn name(&self) -> &str {
        "backfill"
    }

    fn compute(&self, doc: &Document) -> TransformResult<FieldChanges> {
        if doc.is_defined(&self.field) {
            return Ok(FieldChanges::new());
        }
        let value = match &self.value {
            BackfillValue::Constant(value) => Some(value.clone()),
            BackfillValue::Computed(compute) => compute(doc),
        };
        Ok(match value {
            Some(value) if !value.is_null() => FieldChanges::new().set(self.field.clone(), value),
            _ => FieldChanges::new(),
        })
    }
}

/// Unsets a field.
pub struct Removal {
    field: FieldPath,
}

impl Removal {
    pub fn new(field: FieldPath) -> Self {
        Self { field }
    }
}

impl Transform for Removal {
    fn name(&self) -> &str {
        "removal"
    }

    fn compute(&self, doc: &Document) -> TransformResult<FieldChanges> {
        if doc.is_defined(&self.field) {
            Ok(FieldChanges::new().unset(self.field.clone()))
        } else {
            Ok(FieldChanges::new())
        }
    }
}

/// Moves a value between paths when the source is set and the target is not.
pub struct Relocate {
    from: FieldPath,
    to: FieldPath,
}

impl Relocate {
    pub fn new(from: FieldPath, to: FieldPath) -> Self {
        Self { from, to }
    }
}

impl Transform for Relocate {
    fn name(&self) -> &str {
        "relocate"
    }

    fn compute(&self, doc: &Document) -> TransformResult<FieldChanges> {
        match doc.get(&self.from) {
            Some(value) if !doc.is_defined(&self.to) => Ok(FieldChanges::new()
                .set(self.to.clone(), value.clone())
                .unset(self.from.clone())),
            _ => Ok(FieldChanges::new()),
        }
    }
}

/// Composes `{_type: "geopoint", lat, lng}` from two coordinate fields and
/// removes them.
///
/// Coordinates may be numbers or numeric strings. Only documents carrying
/// both are touched; out-of-range values are a transform error.
pub struct GeoPoint {
    lat: FieldPath,
    lng: FieldPath,
    target: FieldPath,
}

impl GeoPoint {
    pub fn new(lat: FieldPath, lng: FieldPath, target: FieldPath) -> Self {
        Self { lat, lng, target }
    }

    fn coordinate(&self, doc: &Document, field: &FieldPath, limit: f64) -> TransformResult<f64> {
        let invalid = |reason: String| TransformError::InvalidInput {
            document_id: doc.id.to_string(),
            field: field.to_string(),
            reason,
        };

        let value = match doc.get(field) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().replace(',', ".").parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| invalid("is not a number".to_string()))?;

        if !value.is_finite() || value.abs() > limit {
            return Err(invalid(format!("{value} is outside ±{limit}")));
        }
        Ok(value)
    }
}

impl Transform for GeoPoint {
    fn name(&self) -> &str {
        "geopoint"
    }

    fn compute(&self, doc: &Document) -> TransformResult<FieldChanges> {
        if doc.is_defined(&self.target)
            || !doc.is_defined(&self.lat)
            || !doc.is_defined(&self.lng)
        {
            return Ok(FieldChanges::new());
        }

        let lat = self.coordinate(doc, &self.lat, 90.0)?;
        let lng = self.coordinate(doc, &self.lng, 180.0)?;
        Ok(FieldChanges::new()
            .set(
                self.target.clone(),
                json!({ "_type": "geopoint", "lat": lat, "lng": lng }),
            )
            .unset(self.lat.clone())
            .unset(self.lng.clone()))
    }
}

/// Runs transforms in order, each one seeing the document as the previous
/// ones left it. Changes are merged; later transforms win on the same path.
pub struct Chain {
    name: String,
    steps: Vec<Box<dyn Transform>>,
}

impl Chain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn then(mut self, step: impl Transform + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Transform for Chain {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, doc: &Document) -> TransformResult<FieldChanges> {
        let mut working = doc.clone();
        let mut merged = FieldChanges::new();

        for step in &self.steps {
            let changes = step.compute(&working)?;
            if changes.is_empty() {
                continue;
            }
            changes
                .apply_to(&mut working)
                .map_err(|source| TransformError::ChainStep {
                    transform: step.name().to_string(),
                    source,
                })?;
            merged.merge(changes);
        }

        Ok(merged)
    }
}

#[cfg(test)]
#[path = "fields_test.rs"]
mod tests;

//! The transform contract and the changes a transform produces.

use crate::error::TransformResult;
use pw_core::{CoreResult, Document, FieldOp, FieldPath};
use serde_json::Value;

/// Fields a transform wants written and removed on one document.
///
/// Paths are unique across both lists: setting a path drops any pending
/// unset of it and vice versa.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldChanges {
    pub set: Vec<(FieldPath, Value)>,
    pub unset: Vec<FieldPath>,
}

impl FieldChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: FieldPath, value: Value) -> Self {
        self.push_set(field, value);
        self
    }

    pub fn unset(mut self, field: FieldPath) -> Self {
        self.push_unset(field);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }

    fn push_set(&mut self, field: FieldPath, value: Value) {
        self.unset.retain(|f| *f != field);
        match self.set.iter_mut().find(|(f, _)| *f == field) {
            Some((_, existing)) => *existing = value,
            None => self.set.push((field, value)),
        }
    }

    fn push_unset(&mut self, field: FieldPath) {
        self.set.retain(|(f, _)| *f != field);
        if !self.unset.contains(&field) {
            self.unset.push(field);
        }
    }

    /// Fold later changes into these; later changes win on the same path.
    pub fn merge(&mut self, later: FieldChanges) {
        for (field, value) in later.set {
            self.push_set(field, value);
        }
        for field in later.unset {
            self.push_unset(field);
        }
    }

    /// Apply to an in-memory copy of a document.
    pub fn apply_to(&self, doc: &mut Document) -> CoreResult<()> {
        for (field, value) in &self.set {
            doc.set(field, value.clone())?;
        }
        for field in &self.unset {
            doc.unset(field);
        }
        Ok(())
    }

    /// Patch operations in write order: sets first, then unsets.
    pub fn into_operations(self) -> Vec<FieldOp> {
        let sets = self
            .set
            .into_iter()
            .map(|(field, value)| FieldOp::Set { field, value });
        let unsets = self.unset.into_iter().map(|field| FieldOp::Unset { field });
        sets.chain(unsets).collect()
    }
}

/// A deterministic per-document transform.
///
/// `compute` must depend only on the document it is given, so planning the
/// same snapshot twice yields the same changes, and planning a document that
/// already reflects the transform yields no changes.
pub trait Transform: Send + Sync {
    /// Short identifier used in logs and `pw list`
    fn name(&self) -> &str;

    fn compute(&self, doc: &Document) -> TransformResult<FieldChanges>;
}

impl<T: Transform + ?Sized> Transform for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn compute(&self, doc: &Document) -> TransformResult<FieldChanges> {
        (**self).compute(doc)
    }
}

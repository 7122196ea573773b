//! Patch operations: the per-document set/unset changes a migration applies.

use crate::document::Document;
use crate::error::{CoreError, CoreResult};
use crate::field_path::FieldPath;
use crate::ids::DocumentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Longest rendered value shown in progress output
const SUMMARY_VALUE_WIDTH: usize = 60;

/// One change to one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldOp {
    Set { field: FieldPath, value: Value },
    Unset { field: FieldPath },
}

impl FieldOp {
    pub fn field(&self) -> &FieldPath {
        match self {
            FieldOp::Set { field, .. } | FieldOp::Unset { field } => field,
        }
    }
}

impl fmt::Display for FieldOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldOp::Set { field, value } => {
                let rendered = value.to_string();
                if rendered.chars().count() > SUMMARY_VALUE_WIDTH {
                    let head: String = rendered.chars().take(SUMMARY_VALUE_WIDTH).collect();
                    write!(f, "set {field} = {head}...")
                } else {
                    write!(f, "set {field} = {rendered}")
                }
            }
            FieldOp::Unset { field } => write!(f, "unset {field}"),
        }
    }
}

/// All changes for one document.
///
/// Wire shape: `{documentId, ifRevisionID?, operations: [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOp {
    pub document_id: DocumentId,

    /// Revision the patch was planned against; stores reject the patch when
    /// the document has moved on.
    #[serde(
        rename = "ifRevisionID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub if_revision: Option<String>,

    pub operations: Vec<FieldOp>,
}

impl PatchOp {
    pub fn new(document_id: DocumentId) -> Self {
        Self {
            document_id,
            if_revision: None,
            operations: Vec::new(),
        }
    }

    pub fn with_revision(mut self, rev: Option<String>) -> Self {
        self.if_revision = rev;
        self
    }

    pub fn set(mut self, field: FieldPath, value: Value) -> Self {
        self.operations.push(FieldOp::Set { field, value });
        self
    }

    pub fn unset(mut self, field: FieldPath) -> Self {
        self.operations.push(FieldOp::Unset { field });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Reject operations that touch store-owned fields.
    pub fn validate(&self) -> CoreResult<()> {
        match self.operations.iter().find(|op| op.field().is_system()) {
            Some(op) => Err(CoreError::ProtectedField {
                field: op.field().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Apply all operations in order to an in-memory document.
    ///
    /// Validation happens before anything is written, so a rejected patch
    /// leaves `doc` unchanged.
    pub fn apply_to(&self, doc: &mut Document) -> CoreResult<()> {
        self.validate()?;
        let mut updated = doc.clone();
        for op in &self.operations {
            match op {
                FieldOp::Set { field, value } => updated.set(field, value.clone())?,
                FieldOp::Unset { field } => updated.unset(field),
            }
        }
        *doc = updated;
        Ok(())
    }

    /// One-line description for progress output.
    pub fn summary(&self) -> String {
        self.operations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Outcome of planning one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// The document already reflects the transform
    NoOp,
    Patch(PatchOp),
}

impl Plan {
    pub fn is_noop(&self) -> bool {
        matches!(self, Plan::NoOp)
    }
}

#[cfg(test)]
#[path = "patch_test.rs"]
mod tests;

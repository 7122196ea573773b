//! Planning: turn a transform's desired changes into the minimal patch.

use crate::error::PlanError;
use pw_core::{Document, FieldOp, PatchOp, Plan};
use pw_transform::Transform;

/// Plan one document.
///
/// Sets whose target already holds the desired value and unsets whose target
/// is already undefined are dropped; if nothing is left the plan is
/// [`Plan::NoOp`]. The patch is guarded by the document's revision when the
/// store reported one.
pub fn plan(doc: &Document, transform: &dyn Transform) -> Result<Plan, PlanError> {
    let changes = transform.compute(doc)?;

    let operations: Vec<FieldOp> = changes
        .into_operations()
        .into_iter()
        .filter(|op| match op {
            FieldOp::Set { field, value } => doc.get(field) != Some(value),
            FieldOp::Unset { field } => doc.is_defined(field),
        })
        .collect();

    if operations.is_empty() {
        return Ok(Plan::NoOp);
    }

    let op = PatchOp {
        document_id: doc.id.clone(),
        if_revision: doc.rev.clone(),
        operations,
    };
    op.validate().map_err(PlanError::Protected)?;
    Ok(Plan::Patch(op))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pw_core::{DocumentId, DocumentType, FieldPath};
    use pw_transform::{Backfill, FieldChanges, Removal, TransformError, TransformResult};
    use serde_json::json;

    fn path(p: &str) -> FieldPath {
        FieldPath::parse(p).unwrap()
    }

    fn villa() -> Document {
        let mut doc = Document::new(
            DocumentId::try_new("villa-1").unwrap(),
            DocumentType::try_new("villa").unwrap(),
        )
        .with_field("propertyType", json!("villa"));
        doc.rev = Some("rev-7".to_string());
        doc
    }

    /// Always asks for the same changes, whatever the document holds
    struct Fixed(FieldChanges);

    impl Transform for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn compute(&self, _doc: &Document) -> TransformResult<FieldChanges> {
            Ok(self.0.clone())
        }
    }

    struct Rejecting;

    impl Transform for Rejecting {
        fn name(&self) -> &str {
            "rejecting"
        }

        fn compute(&self, doc: &Document) -> TransformResult<FieldChanges> {
            Err(TransformError::InvalidInput {
                document_id: doc.id.to_string(),
                field: "latitude".to_string(),
                reason: "is not a number".to_string(),
            })
        }
    }

    #[test]
    fn test_patch_carries_revision() {
        let t = Backfill::constant(path("icon"), json!("pool"));
        let Plan::Patch(op) = plan(&villa(), &t).unwrap() else {
            panic!("expected a patch");
        };
        assert_eq!(op.document_id.as_str(), "villa-1");
        assert_eq!(op.if_revision.as_deref(), Some("rev-7"));
        assert_eq!(op.summary(), r#"set icon = "pool""#);
    }

    #[test]
    fn test_redundant_operations_dropped() {
        let t = Fixed(
            FieldChanges::new()
                .set(path("propertyType"), json!("villa"))
                .set(path("icon"), json!("pool"))
                .unset(path("legacyPrice")),
        );
        let Plan::Patch(op) = plan(&villa(), &t).unwrap() else {
            panic!("expected a patch");
        };
        assert_eq!(op.summary(), r#"set icon = "pool""#);
    }

    #[test]
    fn test_already_migrated_is_noop() {
        let t = Fixed(
            FieldChanges::new()
                .set(path("propertyType"), json!("villa"))
                .unset(path("legacyPrice")),
        );
        assert!(plan(&villa(), &t).unwrap().is_noop());
        assert!(plan(&villa(), &Removal::new(path("legacyPrice")))
            .unwrap()
            .is_noop());
    }

    #[test]
    fn test_protected_field_is_plan_error() {
        let t = Fixed(FieldChanges::new().set(path("_type"), json!("apartment")));
        let err = plan(&villa(), &t).unwrap_err();
        assert!(matches!(err, PlanError::Protected(_)));
        assert!(err.to_string().contains("_type"), "{err}");
    }

    #[test]
    fn test_transform_error_is_plan_error() {
        let err = plan(&villa(), &Rejecting).unwrap_err();
        assert!(matches!(err, PlanError::Transform(_)));
        assert!(err.to_string().starts_with("[P002] [T001]"), "{err}");
    }
}

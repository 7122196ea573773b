use super::*;
use pw_core::{DocumentId, FieldPath};

fn config(use_cdn: bool, token: Option<&str>) -> StoreConfig {
    StoreConfig {
        project_id: "abc123".to_string(),
        dataset: "production".to_string(),
        api_version: "v2024-01-01".to_string(),
        token: token.map(str::to_string),
        use_cdn,
        timeout_ms: 1_000,
    }
}

fn path(p: &str) -> FieldPath {
    FieldPath::parse(p).unwrap()
}

fn id(s: &str) -> DocumentId {
    DocumentId::try_new(s).unwrap()
}

#[test]
fn test_urls() {
    let store = HttpStore::new(config(false, None)).unwrap();
    assert_eq!(
        store.query_url(),
        "https://abc123.api.sanity.io/v2024-01-01/data/query/production"
    );
    assert_eq!(
        store.mutate_url(),
        "https://abc123.api.sanity.io/v2024-01-01/data/mutate/production"
    );
    assert_eq!(store.store_type(), "http");
}

#[test]
fn test_cdn_only_affects_reads() {
    let store = HttpStore::new(config(true, None)).unwrap();
    assert!(store.query_url().starts_with("https://abc123.apicdn.sanity.io/"));
    assert!(store.mutate_url().starts_with("https://abc123.api.sanity.io/"));
}

#[test]
fn test_bearer_token_attached_when_present() {
    let store = HttpStore::new(config(false, Some("sk-test"))).unwrap();
    let request = store
        .authorized(store.http.get(store.query_url()))
        .build()
        .unwrap();
    assert_eq!(
        request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
        "Bearer sk-test"
    );

    let anonymous = HttpStore::new(config(false, None)).unwrap();
    let request = anonymous
        .authorized(anonymous.http.get(anonymous.query_url()))
        .build()
        .unwrap();
    assert!(request
        .headers()
        .get(reqwest::header::AUTHORIZATION)
        .is_none());
}

#[test]
fn test_mutation_body_groups_in_order() {
    let op = PatchOp::new(id("villa-1"))
        .with_revision(Some("rev-1".to_string()))
        .set(path("privateInfo.address"), json!("1 rue du Port"))
        .set(path("privateInfo.ownerPhone"), json!("+33 6"))
        .unset(path("address"))
        .unset(path("ownerPhone"));
    let other = PatchOp::new(id("villa-2")).set(path("propertyType"), json!("villa"));

    let body = mutation_body("tx-1", &[op, other]);
    assert_eq!(
        body,
        json!({
            "transactionId": "tx-1",
            "mutations": [
                { "patch": {
                    "id": "villa-1",
                    "ifRevisionID": "rev-1",
                    "set": {
                        "privateInfo.address": "1 rue du Port",
                        "privateInfo.ownerPhone": "+33 6"
                    }
                }},
                { "patch": { "id": "villa-1", "unset": ["address", "ownerPhone"] } },
                { "patch": { "id": "villa-2", "set": { "propertyType": "villa" } } }
            ]
        })
    );
}

#[test]
fn test_mutation_body_interleaved_kinds() {
    let op = PatchOp::new(id("a"))
        .unset(path("x"))
        .set(path("y"), json!(1))
        .unset(path("z"));
    let body = mutation_body("tx", &[op]);
    let mutations = body["mutations"].as_array().unwrap();
    assert_eq!(mutations.len(), 3);
    assert_eq!(mutations[0]["patch"]["unset"], json!(["x"]));
    assert_eq!(mutations[1]["patch"]["set"], json!({ "y": 1 }));
    assert_eq!(mutations[2]["patch"]["unset"], json!(["z"]));
}

#[test]
fn test_decode_query_response() {
    let docs = decode_query_response(
        r#"{"ms": 4, "query": "*", "result": [
            {"_id": "e1", "_type": "equipment", "_rev": "r1", "name": "Wifi"},
            {"_id": "e2", "_type": "equipment", "name": "Piscine"}
        ]}"#,
    )
    .unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].rev.as_deref(), Some("r1"));
    assert_eq!(docs[1].display_name(), "Piscine");
}

#[test]
fn test_decode_rejects_malformed_documents() {
    let err = decode_query_response(r#"{"result": [{"_id": "e1"}]}"#).unwrap_err();
    assert!(matches!(err, StoreError::DecodeError(_)));

    let err = decode_query_response("not json").unwrap_err();
    assert!(matches!(err, StoreError::DecodeError(_)));
}

#[test]
fn test_error_message_extraction() {
    assert_eq!(
        error_message(r#"{"error": {"description": "Document has been modified", "type": "mutationError"}}"#),
        "Document has been modified"
    );
    assert_eq!(
        error_message(r#"{"error": "Unauthorized", "message": "Session not found"}"#),
        "Session not found"
    );
    assert_eq!(error_message(r#"{"error": "Forbidden"}"#), "Forbidden");
    assert_eq!(error_message("  gateway timeout \n"), "gateway timeout");
}

#[test]
fn test_guarded_patch_conflict_maps_to_revision_conflict() {
    let op = PatchOp::new(id("villa-1"))
        .with_revision(Some("rev-1".to_string()))
        .set(path("propertyType"), json!("villa"));
    let rejection = Rejection {
        status: Some(409),
        message: "HTTP 409: Document has been modified".to_string(),
    };

    let err = patch_error(&op, rejection);
    assert!(matches!(
        &err,
        StoreError::RevisionConflict { document_id, expected, .. }
            if document_id == "villa-1" && expected == "rev-1"
    ));
    assert!(err.to_string().starts_with("[S005]"));
}

#[test]
fn test_other_rejections_stay_patch_rejected() {
    let guarded = PatchOp::new(id("villa-1")).with_revision(Some("rev-1".to_string()));
    let err = patch_error(
        &guarded,
        Rejection {
            status: Some(400),
            message: "HTTP 400: bad field".to_string(),
        },
    );
    assert!(matches!(
        err,
        StoreError::PatchRejected { ref message, .. } if message == "HTTP 400: bad field"
    ));

    // Without a guard a 409 is not a revision mismatch
    let unguarded = PatchOp::new(id("villa-2"));
    let err = patch_error(
        &unguarded,
        Rejection {
            status: Some(409),
            message: "HTTP 409: conflict".to_string(),
        },
    );
    assert!(matches!(err, StoreError::PatchRejected { .. }));

    let err = patch_error(
        &unguarded,
        Rejection {
            status: None,
            message: "connection reset".to_string(),
        },
    );
    assert!(err.to_string().contains("connection reset"));
}

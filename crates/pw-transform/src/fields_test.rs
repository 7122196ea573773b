use super::*;
use pw_core::{DocumentId, DocumentType};

fn path(p: &str) -> FieldPath {
    FieldPath::parse(p).unwrap()
}

fn villa() -> Document {
    Document::new(
        DocumentId::try_new("villa-1").unwrap(),
        DocumentType::try_new("villa").unwrap(),
    )
    .with_field("name", json!("Mas des Pins"))
}

fn geo_private_info() -> Chain {
    Chain::new("geo-private-info")
        .then(Relocate::new(path("address"), path("privateInfo.address")))
        .then(Relocate::new(path("ownerPhone"), path("privateInfo.ownerPhone")))
        .then(GeoPoint::new(
            path("latitude"),
            path("longitude"),
            path("location"),
        ))
}

#[test]
fn test_backfill_constant_only_where_undefined() {
    let t = Backfill::constant(path("propertyType"), json!("villa"));
    let changes = t.compute(&villa()).unwrap();
    assert_eq!(changes.set, vec![(path("propertyType"), json!("villa"))]);

    let done = villa().with_field("propertyType", json!("apartment"));
    assert!(t.compute(&done).unwrap().is_empty());

    // null counts as undefined
    let null = villa().with_field("propertyType", Value::Null);
    assert!(!t.compute(&null).unwrap().is_empty());
}

#[test]
fn test_backfill_computed() {
    let t = Backfill::computed(path("slug"), |doc| {
        doc.text(&FieldPath::parse("name").ok()?)
            .map(|name| json!(name.to_lowercase().replace(' ', "-")))
    });
    let changes = t.compute(&villa()).unwrap();
    assert_eq!(changes.set, vec![(path("slug"), json!("mas-des-pins"))]);

    let nameless = Document::new(
        DocumentId::try_new("villa-2").unwrap(),
        DocumentType::try_new("villa").unwrap(),
    );
    assert!(t.compute(&nameless).unwrap().is_empty());
}

#[test]
fn test_removal() {
    let t = Removal::new(path("legacyPrice"));
    let doc = villa().with_field("legacyPrice", json!(1200));
    assert_eq!(t.compute(&doc).unwrap().unset, vec![path("legacyPrice")]);
    assert!(t.compute(&villa()).unwrap().is_empty());
}

#[test]
fn test_relocate() {
    let t = Relocate::new(path("address"), path("privateInfo.address"));
    let doc = villa().with_field("address", json!("1 chemin des Vignes"));
    let changes = t.compute(&doc).unwrap();
    assert_eq!(
        changes.set,
        vec![(path("privateInfo.address"), json!("1 chemin des Vignes"))]
    );
    assert_eq!(changes.unset, vec![path("address")]);

    // target already present: leave both alone
    let both = doc.with_field("privateInfo", json!({ "address": "elsewhere" }));
    assert!(t.compute(&both).unwrap().is_empty());
}

#[test]
fn test_geopoint() {
    let t = GeoPoint::new(path("latitude"), path("longitude"), path("location"));
    let doc = villa()
        .with_field("latitude", json!(43.55))
        .with_field("longitude", json!("7,01"));
    let changes = t.compute(&doc).unwrap();
    assert_eq!(
        changes.set,
        vec![(
            path("location"),
            json!({ "_type": "geopoint", "lat": 43.55, "lng": 7.01 })
        )]
    );
    assert_eq!(changes.unset, vec![path("latitude"), path("longitude")]);
}

#[test]
fn test_geopoint_needs_both_coordinates() {
    let t = GeoPoint::new(path("latitude"), path("longitude"), path("location"));
    let doc = villa().with_field("latitude", json!(43.55));
    assert!(t.compute(&doc).unwrap().is_empty());
}

#[test]
fn test_geopoint_rejects_bad_coordinates() {
    let t = GeoPoint::new(path("latitude"), path("longitude"), path("location"));
    let out_of_range = villa()
        .with_field("latitude", json!(143.0))
        .with_field("longitude", json!(7.0));
    let err = t.compute(&out_of_range).unwrap_err();
    assert!(matches!(err, TransformError::InvalidInput { ref field, .. } if field == "latitude"));

    let text = villa()
        .with_field("latitude", json!(43.0))
        .with_field("longitude", json!("east"));
    let err = t.compute(&text).unwrap_err();
    assert!(err.to_string().contains("[T001]"), "{err}");
}

#[test]
fn test_chain_merges_steps() {
    let doc = villa()
        .with_field("address", json!("1 chemin des Vignes"))
        .with_field("ownerPhone", json!("+33 6 00 00 00 00"))
        .with_field("latitude", json!(43.0))
        .with_field("longitude", json!(6.5));

    let changes = geo_private_info().compute(&doc).unwrap();
    let set: Vec<&str> = changes.set.iter().map(|(f, _)| f.as_str()).collect();
    assert_eq!(
        set,
        vec!["privateInfo.address", "privateInfo.ownerPhone", "location"]
    );
    let unset: Vec<&str> = changes.unset.iter().map(FieldPath::as_str).collect();
    assert_eq!(unset, vec!["address", "ownerPhone", "latitude", "longitude"]);
}

#[test]
fn test_chain_is_idempotent() {
    let chain = geo_private_info();
    let mut doc = villa()
        .with_field("address", json!("1 chemin des Vignes"))
        .with_field("latitude", json!(43.0))
        .with_field("longitude", json!(6.5));

    chain.compute(&doc).unwrap().apply_to(&mut doc).unwrap();
    assert_eq!(
        doc.get(&path("privateInfo.address")),
        Some(&json!("1 chemin des Vignes"))
    );
    assert!(!doc.is_defined(&path("address")));
    assert!(chain.compute(&doc).unwrap().is_empty());
}

#[test]
fn test_chain_step_error_names_step() {
    // second step writes under a scalar the first step produced
    let chain = Chain::new("broken")
        .then(Backfill::constant(path("privateInfo"), json!("n/a")))
        .then(Relocate::new(path("address"), path("privateInfo.address")));
    let doc = villa().with_field("address", json!("x"));
    let err = chain.compute(&doc).unwrap_err();
    assert!(matches!(err, TransformError::ChainStep { ref transform, .. } if transform == "relocate"));
}

use super::*;
use crate::ids::DocumentId;
use serde_json::json;

fn path(p: &str) -> FieldPath {
    FieldPath::parse(p).unwrap()
}

fn doc_type(t: &str) -> DocumentType {
    DocumentType::try_new(t).unwrap()
}

fn equipment(id: &str, fields: serde_json::Value) -> Document {
    let mut value = fields;
    value["_id"] = json!(id);
    value["_type"] = json!("equipment");
    Document::from_value(value).unwrap()
}

#[test]
fn test_and_flattens() {
    let filter = Filter::TypeIs(doc_type("villa"))
        .and(Filter::Undefined(path("icon")))
        .and(Filter::Defined(path("name")));
    match filter {
        Filter::And(parts) => assert_eq!(parts.len(), 3),
        other => panic!("expected And, got {other:?}"),
    }
}

#[test]
fn test_matches_type_and_presence() {
    let filter = Filter::TypeIs(doc_type("equipment")).and(Filter::Undefined(path("icon")));

    assert!(filter.matches(&equipment("e1", json!({ "name": "Wifi" }))));
    assert!(filter.matches(&equipment("e2", json!({ "icon": null }))));
    assert!(!filter.matches(&equipment("e3", json!({ "icon": "Wifi" }))));
}

#[test]
fn test_matches_equals_or_not() {
    let filter = Filter::Equals(path("language"), json!("FR"))
        .or(Filter::Equals(path("language"), json!("fr-FR")))
        .negate();

    assert!(!filter.matches(&equipment("e1", json!({ "language": "FR" }))));
    assert!(filter.matches(&equipment("e2", json!({ "language": "fr" }))));
    assert!(filter.matches(&equipment("e3", json!({}))));
}

#[test]
fn test_required_type() {
    let filter = Filter::Defined(path("name")).and(Filter::TypeIs(doc_type("rate")));
    assert_eq!(filter.required_type(), Some(&doc_type("rate")));
    assert_eq!(Filter::Defined(path("name")).required_type(), None);
    let either = Filter::TypeIs(doc_type("a")).or(Filter::TypeIs(doc_type("b")));
    assert_eq!(either.required_type(), None);
}

#[test]
fn test_groq_rendering() {
    let filter = Filter::TypeIs(doc_type("equipment")).and(Filter::Undefined(path("icon")));
    assert_eq!(filter.to_groq(), r#"_type == "equipment" && !defined(icon)"#);

    let nested = Filter::TypeIs(doc_type("villa")).and(
        Filter::Equals(path("language"), json!("FR"))
            .or(Filter::Defined(path("privateInfo.address"))),
    );
    assert_eq!(
        nested.to_groq(),
        r#"_type == "villa" && (language == "FR" || defined(privateInfo.address))"#
    );
}

#[test]
fn test_groq_escapes_strings() {
    let filter = Filter::Equals(path("name"), json!("Villa \"Azur\""));
    assert_eq!(filter.to_groq(), r#"name == "Villa \"Azur\"""#);
}

#[test]
fn test_query_excludes_drafts_by_default() {
    let query = Query::new(Filter::TypeIs(doc_type("equipment")));
    assert_eq!(
        query.to_groq(),
        r#"*[_type == "equipment" && !(_id in path("drafts.**"))] | order(_id asc)"#
    );

    let published = equipment("e1", json!({}));
    let draft = equipment(DocumentId::try_new("e1").unwrap().draft().as_str(), json!({}));
    assert!(query.matches(&published));
    assert!(!query.matches(&draft));

    let with_drafts = query.including_drafts(true);
    assert!(with_drafts.matches(&draft));
    assert_eq!(
        with_drafts.to_groq(),
        r#"*[_type == "equipment"] | order(_id asc)"#
    );
}

#[test]
fn test_query_wraps_top_level_or() {
    let query = Query::new(Filter::TypeIs(doc_type("a")).or(Filter::TypeIs(doc_type("b"))));
    assert_eq!(
        query.to_groq(),
        r#"*[(_type == "a" || _type == "b") && !(_id in path("drafts.**"))] | order(_id asc)"#
    );
}

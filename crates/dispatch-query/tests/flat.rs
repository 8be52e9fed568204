//! Round-trip tests for nested <-> flat query conversion.

use proptest::prelude::*;
use serde_json::{Map, Value, json};

use dispatch_query::{flatten, unflatten};

#[test]
fn flattens_nested_objects_to_dot_paths() {
    let nested = json!({
        "status": {"name": ["Open", "New"]},
        "company": {"name": "Acme"},
        "summary": "printer",
    });
    let flat = flatten(&nested);
    assert_eq!(flat.get("status.name"), Some(&json!(["Open", "New"])));
    assert_eq!(flat.get("company.name"), Some(&json!("Acme")));
    assert_eq!(flat.get("summary"), Some(&json!("printer")));
    assert_eq!(flat.len(), 3);
}

#[test]
fn arrays_stay_atomic_at_any_depth() {
    let nested = json!({"a": {"b": {"c": ["x", "y"]}}, "tags": ["old"]});
    let flat = flatten(&nested);
    assert_eq!(flat.get("a.b.c"), Some(&json!(["x", "y"])));
    assert_eq!(flat.get("tags"), Some(&json!(["old"])));
    assert_eq!(unflatten(&flat), nested);
}

#[test]
fn empty_objects_are_kept() {
    let nested = json!({"filters": {}, "summary": "x"});
    assert_eq!(unflatten(&flatten(&nested)), nested);
}

#[test]
fn flat_query_round_trips() {
    let flat: Map<String, Value> = serde_json::from_value(json!({
        "status.name": ["Open"],
        "company.name": "Acme",
        "id": "12",
    }))
    .unwrap();
    assert_eq!(flatten(&unflatten(&flat)), flat);
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,8}".prop_map(Value::from),
        prop::collection::vec("[a-z]{1,5}", 0..4).prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ]
}

fn nested_query() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
            .prop_map(|map| Value::Object(map.into_iter().collect()))
    })
}

fn query_root() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,4}", nested_query(), 0..5)
        .prop_map(|map| Value::Object(map.into_iter().collect()))
}

proptest! {
    #[test]
    fn unflatten_inverts_flatten(query in query_root()) {
        prop_assert_eq!(unflatten(&flatten(&query)), query);
    }

    #[test]
    fn flatten_inverts_unflatten(query in query_root()) {
        let flat = flatten(&query);
        prop_assert_eq!(flatten(&unflatten(&flat)), flat);
    }
}

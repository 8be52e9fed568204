//! Conversion between nested and dot-path ("flat") query forms.
//!
//! Nested: `{"status": {"name": ["Open"]}}`
//! Flat:   `{"status.name": ["Open"]}`
//!
//! Arrays are atomic leaves at every depth, so list-valued filters survive a
//! round trip wherever they sit. Empty objects are kept as leaves for the same
//! reason.

use serde_json::{Map, Value};

use dispatch_model::FlatQuery;

const SEPARATOR: char = '.';

/// Flattens a nested query into dot-path keys.
///
/// A non-object root has no keys and flattens to an empty query.
pub fn flatten(nested: &Value) -> FlatQuery {
    let mut out = FlatQuery::new();
    if let Value::Object(map) = nested {
        flatten_into(map, None, &mut out);
    }
    out
}

fn flatten_into(map: &Map<String, Value>, prefix: Option<&str>, out: &mut FlatQuery) {
    for (key, value) in map {
        let path = match prefix {
            Some(prefix) => format!("{prefix}{SEPARATOR}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(inner, Some(&path), out),
            _ => {
                out.insert(path, value.clone());
            }
        }
    }
}

/// Rebuilds the nested form of a flat query.
///
/// Keys are applied in map order; when one key is a prefix of another
/// (`a` and `a.b`), the deeper key replaces the shallower leaf.
pub fn unflatten(flat: &FlatQuery) -> Value {
    let mut root = Map::new();
    for (key, value) in flat {
        insert_path(&mut root, key, value.clone());
    }
    Value::Object(root)
}

fn insert_path(root: &mut Map<String, Value>, key: &str, value: Value) {
    let mut segments = key.split(SEPARATOR).peekable();
    let mut current = root;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            return;
        };
        current = next;
    }
}

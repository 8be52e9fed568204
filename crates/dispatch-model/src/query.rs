//! Query values shared by the search and preset layers.

use serde_json::{Map, Value};

/// A query keyed by dot-path (`status.name`) or field id.
///
/// Values are strings for text filters and string lists for dropdown
/// filters; `Value::Null` and missing keys both mean "no filter".
pub type FlatQuery = Map<String, Value>;

/// True for values that count as "not set": null, blank strings, empty
/// lists and empty objects. `0` and `false` are values.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Renders a cell value as text for matching and display.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

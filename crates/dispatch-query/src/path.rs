//! Dot-path access into nested JSON records.

use serde_json::Value;

/// Follows a dot-path (`company.name`) through nested objects.
///
/// Returns `None` as soon as a segment is missing or an intermediate value
/// is not an object. An empty path addresses the record itself.
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(record);
    }
    path.split('.')
        .try_fold(record, |current, segment| current.as_object()?.get(segment))
}

/// Like [`lookup`], but yields `Value::Null` for missing paths.
pub fn value_at(record: &Value, path: &str) -> Value {
    lookup(record, path).cloned().unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn walks_nested_objects() {
        let record = json!({"company": {"name": "Acme"}, "id": 7});
        assert_eq!(lookup(&record, "company.name"), Some(&json!("Acme")));
        assert_eq!(lookup(&record, "id"), Some(&json!(7)));
    }

    #[test]
    fn missing_segments_yield_null() {
        let record = json!({"company": null, "phase": "flat"});
        assert_eq!(value_at(&record, "company.name"), Value::Null);
        assert_eq!(value_at(&record, "phase.path"), Value::Null);
        assert_eq!(value_at(&record, "owner.identifier"), Value::Null);
    }
}

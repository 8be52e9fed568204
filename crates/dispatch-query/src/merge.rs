//! Combining a new partial query with the active one.

use serde_json::Value;

use dispatch_model::FlatQuery;

/// Merges `partial` into `previous`.
///
/// Incremental merges overlay `partial` on `previous` one level deep; a
/// non-incremental merge replaces the query wholesale.
pub fn merge(previous: &FlatQuery, partial: &FlatQuery, incremental: bool) -> FlatQuery {
    if !incremental {
        return partial.clone();
    }
    let mut next = previous.clone();
    for (key, value) in partial {
        next.insert(key.clone(), value.clone());
    }
    next
}

/// Sets a single filter on top of the current query.
pub fn set_filter(query: &FlatQuery, property: &str, value: Value) -> FlatQuery {
    let mut partial = FlatQuery::new();
    partial.insert(property.to_string(), value);
    merge(query, &partial, true)
}

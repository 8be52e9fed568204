//! Multi-column search over resolved rows.
//!
//! Each column contributes one predicate chosen by its [`FilterType`]; a row
//! is kept only when every predicate holds. Output keeps input order.

use serde_json::Value;

use dispatch_model::{Column, FilterType, FlatQuery, is_empty_value, value_to_text};

use crate::resolve::ResolvedRow;

/// Case-insensitive multi-infix match.
///
/// The query is split on whitespace and every term must occur somewhere in
/// `value`. A blank query matches everything.
pub fn multi_infix(value: &str, query: &str) -> bool {
    let haystack = value.to_lowercase();
    query
        .split_whitespace()
        .all(|term| haystack.contains(&term.to_lowercase()))
}

/// Exact membership of `value` in the allowed list.
///
/// Values are compared by their text rendering so a numeric id matches its
/// string form. An empty list matches everything.
pub fn dropdown_match(value: &Value, allowed: &[Value]) -> bool {
    if allowed.is_empty() {
        return true;
    }
    let text = value_to_text(value);
    allowed.iter().any(|candidate| value_to_text(candidate) == text)
}

/// Evaluates one column's predicate for a row.
pub fn column_matches(row: &ResolvedRow, column: &Column, filter: Option<&Value>) -> bool {
    let Some(filter) = filter.filter(|value| !is_empty_value(value)) else {
        return true;
    };
    match column.filter_type {
        FilterType::Text => multi_infix(&row.text(&column.property), &value_to_text(filter)),
        FilterType::Dropdown => match filter {
            Value::Array(allowed) => dropdown_match(row.cell(&column.property), allowed),
            single => dropdown_match(row.cell(&column.property), std::slice::from_ref(single)),
        },
        FilterType::Custom | FilterType::None => true,
    }
}

/// True when the row satisfies every column's predicate.
pub fn row_matches(row: &ResolvedRow, columns: &[Column], query: &FlatQuery) -> bool {
    columns
        .iter()
        .all(|column| column_matches(row, column, query.get(&column.property)))
}

/// Returns the rows matching `query`, in their original order.
pub fn filter_rows<'a>(
    rows: &'a [ResolvedRow],
    columns: &[Column],
    query: &FlatQuery,
) -> Vec<&'a ResolvedRow> {
    let matched: Vec<&ResolvedRow> = rows
        .iter()
        .filter(|row| row_matches(row, columns, query))
        .collect();
    tracing::debug!(
        total = rows.len(),
        matched = matched.len(),
        filters = query.len(),
        "filtered ticket rows"
    );
    matched
}

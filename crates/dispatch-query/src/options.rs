//! Option lists for dropdown filters.

use std::collections::HashSet;

use serde_json::Value;

use dispatch_model::{Column, FilterOption, value_to_text};

use crate::resolve::ResolvedRow;

/// Distinct non-null cell values of a column, in first-seen order.
pub fn distinct_values(rows: &[ResolvedRow], property: &str) -> Vec<Value> {
    let mut seen = HashSet::new();
    rows.iter()
        .map(|row| row.cell(property))
        .filter(|value| !value.is_null())
        .filter(|value| seen.insert(value.to_string()))
        .cloned()
        .collect()
}

/// Options offered by a dropdown column: its extra options first, then one
/// option per distinct row value.
pub fn ranked_options_for_column(column: &Column, rows: &[ResolvedRow]) -> Vec<FilterOption> {
    let distinct = distinct_values(rows, &column.property);
    let mut options: Vec<FilterOption> = column
        .extra_options
        .iter()
        .map(|extra| extra.evaluate(column, &distinct))
        .collect();
    options.extend(
        distinct
            .into_iter()
            .map(|value| FilterOption::new(value_to_text(&value), value)),
    );
    options
}

/// Turns selected dropdown options into a filter value.
///
/// List-valued options are spread, duplicates dropped (first wins). An empty
/// selection clears the filter.
pub fn dropdown_selection(selected: &[FilterOption]) -> Value {
    let mut seen = HashSet::new();
    let values: Vec<Value> = selected
        .iter()
        .flat_map(|option| match &option.value {
            Value::Array(items) => items.clone(),
            single => vec![single.clone()],
        })
        .filter(|value| seen.insert(value.to_string()))
        .collect();
    if values.is_empty() {
        Value::Null
    } else {
        Value::Array(values)
    }
}

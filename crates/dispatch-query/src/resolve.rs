//! Resolution of ticket records into flat, column-keyed rows.
//!
//! Rows are resolved once per record snapshot and then shared by display and
//! filtering, so filters never re-walk the raw records.

use std::collections::BTreeMap;

use serde_json::Value;

use dispatch_model::{Column, FormatContext, value_to_text};

use crate::path::value_at;

/// A record projected through a set of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRow {
    /// Index of the source record in the resolved slice.
    pub source: usize,
    /// Resolved cell per column property.
    pub cells: BTreeMap<String, Value>,
}

impl ResolvedRow {
    /// Cell value for a column property (`Null` if the column was not resolved).
    pub fn cell(&self, property: &str) -> &Value {
        self.cells.get(property).unwrap_or(&Value::Null)
    }

    /// Cell value rendered as text.
    pub fn text(&self, property: &str) -> String {
        value_to_text(self.cell(property))
    }
}

/// Resolves a single cell: dot-path lookup, then the column's transform.
pub fn resolve_cell(record: &Value, column: &Column) -> Value {
    let raw = value_at(record, &column.property);
    match column.cell.as_ref().and_then(|cell| cell.resolve.as_ref()) {
        Some(transform) => transform.resolve(&raw),
        None => raw,
    }
}

/// Resolves every record against every column, preserving record order.
pub fn resolve_rows(records: &[Value], columns: &[Column]) -> Vec<ResolvedRow> {
    let rows: Vec<ResolvedRow> = records
        .iter()
        .enumerate()
        .map(|(source, record)| ResolvedRow {
            source,
            cells: columns
                .iter()
                .map(|column| (column.property.clone(), resolve_cell(record, column)))
                .collect(),
        })
        .collect();
    tracing::debug!(
        records = records.len(),
        columns = columns.len(),
        "resolved ticket rows"
    );
    rows
}

/// Display text of a resolved cell after the column's formatters.
///
/// `record` is the row's source record, handed to formatters as context.
pub fn format_cell(row: &ResolvedRow, column: &Column, record: &Value) -> String {
    let value = row.cell(&column.property);
    let Some(cell) = column.cell.as_ref() else {
        return value_to_text(value);
    };
    let ctx = FormatContext {
        property: &column.property,
        row_data: record,
    };
    let formatted = cell
        .formatters
        .iter()
        .fold(value.clone(), |current, formatter| {
            formatter.format(&current, &ctx)
        });
    value_to_text(&formatted)
}

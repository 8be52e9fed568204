//! Column visibility.

use dispatch_model::Column;

/// Returns the columns with the visibility of `property` flipped.
///
/// Unknown properties leave the columns unchanged.
pub fn toggle_column(columns: &[Column], property: &str) -> Vec<Column> {
    columns
        .iter()
        .map(|column| {
            if column.property == property {
                column.clone().with_visible(!column.visible)
            } else {
                column.clone()
            }
        })
        .collect()
}

pub fn visible_columns(columns: &[Column]) -> Vec<&Column> {
    columns.iter().filter(|column| column.visible).collect()
}

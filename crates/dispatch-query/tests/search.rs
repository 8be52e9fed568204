//! Tests for row resolution, filtering and dropdown options.

use serde_json::{Value, json};

use dispatch_model::{
    CellSpec, Column, ExtraOption, FilterOption, FilterType, FlatQuery, FormatContext,
};
use dispatch_query::{
    distinct_values, dropdown_selection, filter_rows, format_cell, ranked_options_for_column,
    resolve_rows, toggle_column, visible_columns,
};

fn tickets() -> Vec<Value> {
    vec![
        json!({
            "id": 1, "summary": "Summary 123",
            "status": {"name": "Open"}, "company": {"name": "Acme"}
        }),
        json!({
            "id": 2, "summary": "Printer jam",
            "status": {"name": "New"}, "company": {"name": "Globex"}
        }),
        json!({
            "id": 3, "summary": "Summary 456",
            "status": {"name": "Closed"}, "company": {"name": "Acme"}
        }),
        json!({"id": 4, "summary": "VPN down", "status": {"name": "Open"}}),
    ]
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID"),
        Column::new("company.name", "Company"),
        Column::new("summary", "Name"),
        Column::new("status.name", "Status").with_filter(FilterType::Dropdown),
        Column::new("mobileGuid", "Action").with_filter(FilterType::Custom),
    ]
}

fn query(value: Value) -> FlatQuery {
    serde_json::from_value(value).unwrap()
}

fn ids(rows: &[&dispatch_query::ResolvedRow]) -> Vec<i64> {
    rows.iter()
        .map(|row| row.cell("id").as_i64().unwrap())
        .collect()
}

#[test]
fn resolution_preserves_order_and_keys_by_property() {
    let rows = resolve_rows(&tickets(), &columns());
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].source, 0);
    assert_eq!(rows[3].source, 3);
    assert_eq!(rows[1].cell("company.name"), &json!("Globex"));
    assert_eq!(rows[3].cell("company.name"), &Value::Null);
}

#[test]
fn text_filter_requires_every_term() {
    let rows = resolve_rows(&tickets(), &columns());
    let matched = filter_rows(&rows, &columns(), &query(json!({"summary": "sum 1"})));
    assert_eq!(ids(&matched), vec![1]);

    let none = filter_rows(&rows, &columns(), &query(json!({"summary": "xyz"})));
    assert!(none.is_empty());
}

#[test]
fn text_filter_is_case_insensitive() {
    let rows = resolve_rows(&tickets(), &columns());
    let matched = filter_rows(&rows, &columns(), &query(json!({"summary": "SUMMARY"})));
    assert_eq!(ids(&matched), vec![1, 3]);
}

#[test]
fn empty_text_filter_matches_all() {
    let rows = resolve_rows(&tickets(), &columns());
    let matched = filter_rows(&rows, &columns(), &query(json!({"summary": ""})));
    assert_eq!(matched.len(), 4);
}

#[test]
fn dropdown_filter_is_exact_membership() {
    let rows = resolve_rows(&tickets(), &columns());
    let matched = filter_rows(
        &rows,
        &columns(),
        &query(json!({"status.name": ["Open", "New"]})),
    );
    assert_eq!(ids(&matched), vec![1, 2, 4]);

    let all = filter_rows(&rows, &columns(), &query(json!({"status.name": []})));
    assert_eq!(all.len(), 4);
}

#[test]
fn columns_are_and_combined() {
    let rows = resolve_rows(&tickets(), &columns());
    let matched = filter_rows(
        &rows,
        &columns(),
        &query(json!({"status.name": ["Open"], "company.name": "acme"})),
    );
    assert_eq!(ids(&matched), vec![1]);
}

#[test]
fn custom_and_none_columns_always_match() {
    let mut cols = columns();
    cols.push(Column::new("summary", "Hidden").with_filter(FilterType::None));
    let rows = resolve_rows(&tickets(), &cols);
    let matched = filter_rows(&rows, &cols, &query(json!({"mobileGuid": "anything"})));
    assert_eq!(matched.len(), 4);
}

#[test]
fn numeric_cells_match_text_terms() {
    let rows = resolve_rows(&tickets(), &columns());
    let matched = filter_rows(&rows, &columns(), &query(json!({"id": "3"})));
    assert_eq!(ids(&matched), vec![3]);
}

#[test]
fn options_list_extras_then_distinct_values() {
    let closed = vec![json!("Closed")];
    let status = Column::new("status.name", "Status")
        .with_filter(FilterType::Dropdown)
        .with_extra_option(ExtraOption::from_fn(move |_: &Column, distinct: &[Value]| {
            let open: Vec<Value> = distinct
                .iter()
                .filter(|value| !closed.contains(value))
                .cloned()
                .collect();
            FilterOption::new("All Open", Value::Array(open))
        }))
        .with_extra_option(ExtraOption::Static(FilterOption::new(
            "All Complete",
            json!(["Closed"]),
        )));
    let rows = resolve_rows(&tickets(), std::slice::from_ref(&status));

    assert_eq!(
        distinct_values(&rows, "status.name"),
        vec![json!("Open"), json!("New"), json!("Closed")]
    );

    let options = ranked_options_for_column(&status, &rows);
    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["All Open", "All Complete", "Open", "New", "Closed"]);
    assert_eq!(options[0].value, json!(["Open", "New"]));
}

#[test]
fn dropdown_selection_spreads_and_dedupes() {
    let selected = vec![
        FilterOption::new("All Open", json!(["Open", "New"])),
        FilterOption::new("Open", json!("Open")),
        FilterOption::new("Closed", json!("Closed")),
    ];
    assert_eq!(dropdown_selection(&selected), json!(["Open", "New", "Closed"]));
    assert_eq!(dropdown_selection(&[]), Value::Null);
}

#[test]
fn formatters_see_the_source_record() {
    let phase = Column::new("phase.path", "Phase").with_cell(
        CellSpec::new()
            .with_resolve(|value: &Value| json!(format!("({})", value.as_str().unwrap_or(""))))
            .with_formatter(|_: &Value, ctx: &FormatContext<'_>| {
                ctx.row_data["phase"]["name"].clone()
            }),
    );
    let records = vec![json!({"phase": {"path": "Build/QA", "name": "QA"}})];
    let rows = resolve_rows(&records, std::slice::from_ref(&phase));
    assert_eq!(rows[0].cell("phase.path"), &json!("(Build/QA)"));
    assert_eq!(format_cell(&rows[0], &phase, &records[0]), "QA");
}

#[test]
fn toggling_flips_one_column() {
    let toggled = toggle_column(&columns(), "summary");
    let visible: Vec<&str> = visible_columns(&toggled)
        .iter()
        .map(|c| c.property.as_str())
        .collect();
    assert_eq!(visible, vec!["id", "company.name", "status.name", "mobileGuid"]);
    let again = toggle_column(&toggled, "summary");
    assert_eq!(visible_columns(&again).len(), 5);
}

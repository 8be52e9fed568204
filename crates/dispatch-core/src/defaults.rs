//! The stock dispatch form and ticket table.

use chrono::NaiveDate;
use serde_json::{Value, json};

use dispatch_model::{
    CellSpec, Column, ExtraOption, Field, FieldType, FilterOption, FilterType, FormatContext,
    ValueSource, value_to_text,
};
use dispatch_query::value_at;

use crate::ranker::ResourceRanker;
use crate::selection::TICKETS_FIELD;

/// Property of the per-row add/remove action column.
pub const ACTION_PROPERTY: &str = "mobileGuid";

pub const TIMEZONES: [&str; 2] = ["America/New_York", "America/Los_Angeles"];

pub const SKIP_DUPLICATE_MODES: [&str; 3] = ["ignore", "skip", "subtract"];

/// Fields of the dispatch form, dated `today`.
pub fn dispatch_fields(today: NaiveDate, ranker: ResourceRanker) -> Vec<Field> {
    let today = today.format("%Y-%m-%d").to_string();
    vec![
        Field::new("memberIdentifier", FieldType::Select)
            .with_values(ValueSource::derived(ranker))
            .with_required(true)
            .with_allow_custom(true),
        Field::new("startDate", FieldType::Text)
            .with_value(today.clone())
            .with_required(true),
        Field::new("endDate", FieldType::Text).with_value(today),
        Field::new("timezone", FieldType::Select)
            .with_value(TIMEZONES[0])
            .with_values(ValueSource::fixed(TIMEZONES))
            .with_required(true),
        Field::new("startHour", FieldType::Number)
            .with_value(9)
            .with_required(true),
        Field::new("daily", FieldType::Number)
            .with_value(8)
            .with_required(true),
        // Optional cap on the total hours scheduled; unset means no cap.
        Field::new("capTotalHours", FieldType::Number),
        Field::new("skipByStatus", FieldType::Boolean).with_value(true),
        Field::new("skipDuplicateMode", FieldType::Select)
            .with_value("subtract")
            .with_values(ValueSource::fixed(SKIP_DUPLICATE_MODES)),
        Field::new("setAssigned", FieldType::Boolean).with_value(true),
        Field::new("dry", FieldType::Boolean).with_value(false),
        Field::new(TICKETS_FIELD, FieldType::EntityList)
            .with_value(Value::Array(Vec::new()))
            .with_required(true),
    ]
}

/// Columns of the ticket table.
///
/// The status column offers "All Open" (every seen status that is not in
/// `closed_statuses`) and "All Complete" (the closed statuses).
pub fn dispatch_columns(closed_statuses: &[String]) -> Vec<Column> {
    let closed: Vec<String> = closed_statuses.to_vec();
    let open_filter = closed.clone();

    vec![
        Column::new(ACTION_PROPERTY, "Action")
            .with_filter(FilterType::Custom)
            .with_cell(action_cell(Vec::new())),
        Column::new("company.name", "Company"),
        Column::new("project.name", "Project"),
        Column::new("id", "Ticket"),
        Column::new("phase.path", "Phase").with_cell(
            CellSpec::new()
                .with_resolve(|value: &Value| json!(format!("({})", value_to_text(value))))
                .with_formatter(|_: &Value, ctx: &FormatContext<'_>| {
                    value_at(ctx.row_data, "phase.name")
                }),
        ),
        Column::new("summary", "Summary"),
        Column::new("status.name", "Status")
            .with_filter(FilterType::Dropdown)
            .with_extra_option(ExtraOption::from_fn(move |_: &Column, distinct: &[Value]| {
                let open: Vec<Value> = distinct
                    .iter()
                    .filter(|status| !open_filter.contains(&value_to_text(status)))
                    .cloned()
                    .collect();
                FilterOption::new("All Open", open)
            }))
            .with_extra_option(ExtraOption::Static(FilterOption::new(
                "All Complete",
                closed,
            ))),
    ]
}

/// Cell of the action column: "Remove" for selected tickets, "Add" otherwise.
pub fn action_cell(selected: Vec<String>) -> CellSpec {
    CellSpec::new().with_formatter(move |_: &Value, ctx: &FormatContext<'_>| {
        let id = value_to_text(&value_at(ctx.row_data, "id"));
        if selected.contains(&id) {
            json!("Remove")
        } else {
            json!("Add")
        }
    })
}

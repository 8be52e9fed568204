//! Terminal tables.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde_json::Value;

use dispatch_core::{DispatchConsole, TicketPool};
use dispatch_model::{FilterOption, Preset, value_to_text};
use dispatch_query::format_cell;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

/// The tickets matching the console's query, through its visible columns.
pub fn print_filtered(console: &DispatchConsole) {
    let columns = console.display_columns();
    let records = console.tickets().records();
    let rows = console.filtered_rows();

    let mut table = Table::new();
    table.set_header(columns.iter().map(|column| header_cell(&column.header)));
    apply_table_style(&mut table);
    for row in &rows {
        let record = records.get(row.source).unwrap_or(&Value::Null);
        table.add_row(
            columns
                .iter()
                .map(|column| Cell::new(format_cell(row, column, record))),
        );
    }
    println!("{table}");
    println!("{} of {} tickets", rows.len(), records.len());
}

pub fn print_options(options: &[FilterOption]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Option"), header_cell("Value")]);
    apply_table_style(&mut table);
    for option in options {
        table.add_row(vec![
            Cell::new(&option.label),
            dim_cell(value_to_text(&option.value)),
        ]);
    }
    println!("{table}");
}

pub fn print_resources(ranked: &[String]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell("Resource")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, resource) in ranked.iter().enumerate() {
        table.add_row(vec![Cell::new(index + 1), Cell::new(resource)]);
    }
    println!("{table}");
}

pub fn print_presets(presets: &[&Preset]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Label"),
        header_cell("Edits"),
        header_cell("Last edit"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for preset in presets {
        table.add_row(vec![
            dim_cell(&preset.id),
            Cell::new(&preset.label),
            Cell::new(preset.edit_history.len()),
            Cell::new(preset.edit_message().unwrap_or_else(|| "-".to_string())),
        ]);
    }
    println!("{table}");
}

pub fn print_projects(pool: &TicketPool) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Project"), header_cell("Tickets")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (project, tickets) in pool.projects() {
        table.add_row(vec![Cell::new(project), Cell::new(tickets.len())]);
    }
    println!("{table}");
    println!("{}", pool.summary());
}

//! Parsing of tickets files, queries and assignments.

use std::fs;

use serde_json::{Value, json};
use tempfile::TempDir;

use dispatch_cli::input::{
    parse_assignment, parse_preset_value, parse_query, parse_ticket_id, read_tickets,
};

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn reads_project_map() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "tickets.json",
        r#"{"p1": [{"id": 1}, {"id": 2}], "p2": [{"id": 3}]}"#,
    );
    let pool = read_tickets(&path).unwrap();
    assert_eq!(pool.summary(), "3 tickets from 2 projects");
}

#[test]
fn reads_flat_ticket_list() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "tickets.json", r#"[{"id": 1}]"#);
    assert_eq!(read_tickets(&path).unwrap().len(), 1);
}

#[test]
fn rejects_scalar_tickets_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "tickets.json", "42");
    assert!(read_tickets(&path).is_err());
}

#[test]
fn missing_tickets_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let err = read_tickets(&dir.path().join("absent.json")).unwrap_err();
    assert!(format!("{err:#}").contains("absent.json"));
}

#[test]
fn nested_and_dotted_queries_agree() {
    let nested = parse_query(r#"{"status": {"name": ["Open"]}, "summary": "sum"}"#).unwrap();
    let dotted = parse_query(r#"{"status.name": ["Open"], "summary": "sum"}"#).unwrap();
    assert_eq!(nested, dotted);
    assert_eq!(nested.get("status.name"), Some(&json!(["Open"])));
}

#[test]
fn query_must_be_object() {
    assert!(parse_query("[1, 2]").is_err());
    assert!(parse_query("not json").is_err());
}

#[test]
fn preset_values_are_nested() {
    let value = parse_preset_value(r#"{"status.name": ["Open"]}"#).unwrap();
    assert_eq!(value, json!({"status": {"name": ["Open"]}}));
}

#[test]
fn assignments_parse_json_or_text() {
    assert_eq!(
        parse_assignment("daily=6").unwrap(),
        ("daily".to_string(), json!(6))
    );
    assert_eq!(
        parse_assignment("memberIdentifier=lee").unwrap(),
        ("memberIdentifier".to_string(), json!("lee"))
    );
    assert_eq!(
        parse_assignment("dry=true").unwrap(),
        ("dry".to_string(), json!(true))
    );
    assert_eq!(
        parse_assignment("note=a=b").unwrap(),
        ("note".to_string(), json!("a=b"))
    );
    assert!(parse_assignment("daily").is_err());
    assert!(parse_assignment("=6").is_err());
}

#[test]
fn ticket_ids_keep_numbers() {
    assert_eq!(parse_ticket_id("42"), json!(42));
    assert_eq!(parse_ticket_id(" T-1 "), Value::String("T-1".to_string()));
}

//! Parsing of command-line inputs: ticket files, queries and field
//! assignments.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use dispatch_core::TicketPool;
use dispatch_model::FlatQuery;
use dispatch_query::{flatten, unflatten};

/// Reads a tickets file: `{projectId: [ticket, ..]}` or a flat array.
pub fn read_tickets(path: &Path) -> Result<TicketPool> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read tickets file {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("parse tickets file {}", path.display()))?;
    if !value.is_object() && !value.is_array() {
        bail!(
            "tickets file {} must hold a project map or a ticket list",
            path.display()
        );
    }
    let pool = TicketPool::from_value(value);
    tracing::debug!(path = %path.display(), tickets = pool.len(), "read tickets");
    Ok(pool)
}

/// Parses a query given as a JSON object, nested or dot-path keyed.
pub fn parse_query(text: &str) -> Result<FlatQuery> {
    let value: Value = serde_json::from_str(text).context("parse query JSON")?;
    if !value.is_object() {
        bail!("query must be a JSON object");
    }
    Ok(flatten(&value))
}

/// Parses a query into the nested form stored in presets.
pub fn parse_preset_value(text: &str) -> Result<Value> {
    Ok(unflatten(&parse_query(text)?))
}

/// Parses `id=value`. The value is read as JSON when it parses, otherwise
/// taken as a plain string.
pub fn parse_assignment(text: &str) -> Result<(String, Value)> {
    let Some((id, raw)) = text.split_once('=') else {
        bail!("expected id=value, got {text:?}");
    };
    let id = id.trim();
    if id.is_empty() {
        bail!("missing field id in {text:?}");
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((id.to_string(), value))
}

/// Parses a ticket id; numeric ids stay numbers.
pub fn parse_ticket_id(text: &str) -> Value {
    text.trim()
        .parse::<i64>()
        .map_or_else(|_| Value::String(text.trim().to_string()), Value::from)
}

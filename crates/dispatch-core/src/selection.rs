//! Ticket selection held in the `tickets` entity-list field.
//!
//! The field's value is a list of `{"id": .., "hours": ..}` entries. Ids are
//! compared by their text form, so a numeric id and its string match.

use std::collections::HashSet;

use serde_json::{Map, Value};

use dispatch_model::value_to_text;
use dispatch_query::ResolvedRow;

use crate::fields::FieldModel;

/// Id of the entity-list field holding the selection.
pub const TICKETS_FIELD: &str = "tickets";

impl FieldModel {
    fn ticket_entries(&self) -> Vec<Value> {
        match self.value(TICKETS_FIELD) {
            Some(Value::Array(entries)) => entries.clone(),
            Some(_) => Vec::new(),
            None => {
                tracing::warn!(field = TICKETS_FIELD, "no ticket selection field");
                Vec::new()
            }
        }
    }

    fn with_ticket_entries(&self, entries: Vec<Value>) -> Self {
        self.set_value(TICKETS_FIELD, Value::Array(entries))
    }

    /// Ids of the selected tickets, in selection order.
    pub fn selected_ticket_ids(&self) -> Vec<String> {
        self.ticket_entries().iter().map(entry_id).collect()
    }

    pub fn is_ticket_selected(&self, id: &Value) -> bool {
        let id = value_to_text(id);
        self.ticket_entries().iter().any(|entry| entry_id(entry) == id)
    }

    /// Selects the ticket, or deselects it when already selected.
    #[must_use]
    pub fn toggle_ticket(&self, id: &Value) -> Self {
        let text = value_to_text(id);
        let mut entries = self.ticket_entries();
        let before = entries.len();
        entries.retain(|entry| entry_id(entry) != text);
        if entries.len() == before {
            entries.push(new_entry(id));
        }
        self.with_ticket_entries(entries)
    }

    /// Appends every id not already selected.
    #[must_use]
    pub fn add_tickets<'a>(&self, ids: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut entries = self.ticket_entries();
        let mut seen: HashSet<String> = entries.iter().map(entry_id).collect();
        for id in ids {
            if seen.insert(value_to_text(id)) {
                entries.push(new_entry(id));
            }
        }
        self.with_ticket_entries(entries)
    }

    /// Selects every ticket behind the filtered rows.
    #[must_use]
    pub fn add_filtered(&self, records: &[Value], rows: &[&ResolvedRow]) -> Self {
        let ids: Vec<&Value> = rows
            .iter()
            .filter_map(|row| records.get(row.source))
            .filter_map(|record| record.get("id"))
            .collect();
        tracing::info!(tickets = ids.len(), "adding filtered tickets");
        self.add_tickets(ids)
    }

    /// Clears the selection.
    #[must_use]
    pub fn reset_tickets(&self) -> Self {
        self.with_ticket_entries(Vec::new())
    }

    /// Sets the hours budget of a selected ticket. Unselected ids are ignored.
    #[must_use]
    pub fn set_ticket_hours(&self, id: &Value, hours: Value) -> Self {
        let text = value_to_text(id);
        let entries = self
            .ticket_entries()
            .into_iter()
            .map(|mut entry| {
                if entry_id(&entry) == text
                    && let Value::Object(map) = &mut entry
                {
                    map.insert("hours".to_string(), hours.clone());
                }
                entry
            })
            .collect();
        self.with_ticket_entries(entries)
    }

    /// Records of the selected tickets, in selection order.
    ///
    /// Selected ids with no matching record are skipped.
    pub fn selected_tickets<'a>(&self, records: &'a [Value]) -> Vec<&'a Value> {
        self.selected_ticket_ids()
            .iter()
            .filter_map(|id| {
                let found = records
                    .iter()
                    .find(|record| record.get("id").is_some_and(|rid| value_to_text(rid) == *id));
                if found.is_none() {
                    tracing::debug!(ticket = %id, "selected ticket not in records");
                }
                found
            })
            .collect()
    }
}

fn entry_id(entry: &Value) -> String {
    match entry {
        Value::Object(map) => map.get("id").map(value_to_text).unwrap_or_default(),
        other => value_to_text(other),
    }
}

fn new_entry(id: &Value) -> Value {
    let mut map = Map::new();
    map.insert("id".to_string(), id.clone());
    Value::Object(map)
}

//! Ticket records grouped by project.

use std::collections::BTreeMap;

use serde_json::Value;

/// Project key used for tickets supplied as a flat list.
pub const UNGROUPED_PROJECT: &str = "ungrouped";

/// The live ticket set: per-project lists plus one flattened list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketPool {
    nested: BTreeMap<String, Vec<Value>>,
    flattened: Vec<Value>,
}

impl TicketPool {
    pub fn from_projects(nested: BTreeMap<String, Vec<Value>>) -> Self {
        let flattened = nested.values().flatten().cloned().collect();
        Self { nested, flattened }
    }

    /// Accepts `{projectId: [ticket, ..]}` or a flat ticket array.
    ///
    /// Non-array project entries and other shapes contribute no tickets.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(projects) => Self::from_projects(
                projects
                    .into_iter()
                    .filter_map(|(project, tickets)| match tickets {
                        Value::Array(tickets) => Some((project, tickets)),
                        _ => {
                            tracing::warn!(%project, "project entry is not a ticket list");
                            None
                        }
                    })
                    .collect(),
            ),
            Value::Array(tickets) if tickets.is_empty() => Self::default(),
            Value::Array(tickets) => {
                Self::from_projects(BTreeMap::from([(UNGROUPED_PROJECT.to_string(), tickets)]))
            }
            _ => {
                tracing::warn!("ticket data is neither a project map nor a list");
                Self::default()
            }
        }
    }

    /// All tickets, project by project.
    pub fn records(&self) -> &[Value] {
        &self.flattened
    }

    pub fn projects(&self) -> &BTreeMap<String, Vec<Value>> {
        &self.nested
    }

    pub fn len(&self) -> usize {
        self.flattened.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flattened.is_empty()
    }

    pub fn project_count(&self) -> usize {
        self.nested.len()
    }

    /// Returns a pool with one project's tickets replaced.
    #[must_use]
    pub fn with_project(&self, project_id: &str, tickets: Vec<Value>) -> Self {
        let mut nested = self.nested.clone();
        nested.insert(project_id.to_string(), tickets);
        Self::from_projects(nested)
    }

    /// "N tickets from M projects".
    pub fn summary(&self) -> String {
        format!(
            "{} tickets from {} projects",
            self.len(),
            self.project_count()
        )
    }
}

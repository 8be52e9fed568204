//! Saved query presets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::PresetId;

/// One entry of a preset's edit history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditEntry {
    pub date: DateTime<Utc>,
    /// Display name of the user who made the edit.
    pub name: String,
}

impl EditEntry {
    pub fn new(date: DateTime<Utc>, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }
}

/// A named, persisted query snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: PresetId,
    pub label: String,
    /// The saved query in nested form.
    pub value: Value,
    /// Newest first.
    pub edit_history: Vec<EditEntry>,
}

impl Preset {
    /// The most recent edit, if any.
    pub fn last_edit(&self) -> Option<&EditEntry> {
        self.edit_history.first()
    }

    pub fn last_edited_at(&self) -> Option<DateTime<Utc>> {
        self.last_edit().map(|entry| entry.date)
    }

    /// Human-readable summary of the most recent edit.
    pub fn edit_message(&self) -> Option<String> {
        self.last_edit().map(|entry| {
            format!(
                "Last Edit: {} on {}",
                entry.name,
                entry.date.format("%a %b %d %Y %H:%M:%S UTC")
            )
        })
    }
}

//! The preset collection.
//!
//! [`PresetStore`] is a persistent value: every operation returns a new store
//! and leaves the receiver untouched, so each edit yields a distinguishable
//! snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use dispatch_model::{EditEntry, FlatQuery, Preset, PresetId};
use dispatch_query::flatten;

/// Ordered collection of saved presets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetStore {
    presets: Vec<Preset>,
}

impl PresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_presets(presets: Vec<Preset>) -> Self {
        Self { presets }
    }

    /// Presets in insertion order.
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|preset| preset.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// The most recently added preset.
    pub fn last(&self) -> Option<&Preset> {
        self.presets.last()
    }

    /// Saves `value` as a new preset stamped with `actor` and the current time.
    #[must_use]
    pub fn add(&self, label: &str, value: Value, actor: &str) -> Self {
        self.add_at(label, value, actor, Utc::now())
    }

    #[must_use]
    pub fn add_at(&self, label: &str, value: Value, actor: &str, now: DateTime<Utc>) -> Self {
        let id = self.fresh_id();
        tracing::info!(preset = %id, label, actor, "adding preset");
        let mut presets = self.presets.clone();
        presets.push(Preset {
            id,
            label: label.to_string(),
            value,
            edit_history: vec![EditEntry::new(now, actor)],
        });
        Self { presets }
    }

    /// Replaces a preset's value and records the edit at the head of its
    /// history. Unknown ids leave the store unchanged.
    #[must_use]
    pub fn update(&self, id: &str, value: Value, actor: &str) -> Self {
        self.update_at(id, value, actor, Utc::now())
    }

    #[must_use]
    pub fn update_at(&self, id: &str, value: Value, actor: &str, now: DateTime<Utc>) -> Self {
        if !self.contains(id) {
            tracing::debug!(preset = id, "update of unknown preset ignored");
            return self.clone();
        }
        tracing::info!(preset = id, actor, "updating preset");
        let presets = self
            .presets
            .iter()
            .map(|preset| {
                if preset.id != id {
                    return preset.clone();
                }
                let mut edit_history = Vec::with_capacity(preset.edit_history.len() + 1);
                edit_history.push(EditEntry::new(now, actor));
                edit_history.extend(preset.edit_history.iter().cloned());
                Preset {
                    id: preset.id.clone(),
                    label: preset.label.clone(),
                    value: value.clone(),
                    edit_history,
                }
            })
            .collect();
        Self { presets }
    }

    /// Deletes a preset. Unknown ids leave the store unchanged.
    #[must_use]
    pub fn remove(&self, id: &str) -> Self {
        if !self.contains(id) {
            tracing::debug!(preset = id, "removal of unknown preset ignored");
            return self.clone();
        }
        tracing::info!(preset = id, "removing preset");
        Self {
            presets: self
                .presets
                .iter()
                .filter(|preset| preset.id != id)
                .cloned()
                .collect(),
        }
    }

    /// Presets ordered by most recent edit first.
    ///
    /// Presets without history sort last; ties keep insertion order.
    pub fn list_by_recency(&self) -> Vec<&Preset> {
        let mut ordered: Vec<&Preset> = self.presets.iter().collect();
        ordered.sort_by(|a, b| b.last_edited_at().cmp(&a.last_edited_at()));
        ordered
    }

    /// Loads the preset with `id` (see [`load`]). `None` or an unknown id
    /// yields an empty query.
    pub fn load_by_id(
        &self,
        id: Option<&str>,
        current: &FlatQuery,
        maintain_depth: &[String],
    ) -> FlatQuery {
        load(id.and_then(|id| self.get(id)), current, maintain_depth)
    }

    fn fresh_id(&self) -> PresetId {
        loop {
            let id = PresetId::generate();
            if !self.contains(id.as_str()) {
                return id;
            }
        }
    }
}

/// Builds the query to run when a preset is loaded.
///
/// The preset's saved value is flattened to dot-path form, except for the
/// `maintain_depth` properties: those (and anything below them) are taken
/// from the `current` query so they keep reflecting the live session. A
/// maintained property absent from `current` stays absent.
///
/// Loading no preset yields an empty query.
pub fn load(preset: Option<&Preset>, current: &FlatQuery, maintain_depth: &[String]) -> FlatQuery {
    let Some(preset) = preset else {
        return FlatQuery::new();
    };

    let mut next = flatten(&preset.value);
    next.retain(|key, _| !is_maintained(key, maintain_depth));
    for (key, value) in current {
        if is_maintained(key, maintain_depth) {
            next.insert(key.clone(), value.clone());
        }
    }
    tracing::debug!(preset = %preset.id, filters = next.len(), "loaded preset");
    next
}

fn is_maintained(key: &str, maintain_depth: &[String]) -> bool {
    maintain_depth.iter().any(|property| {
        key == property
            || key
                .strip_prefix(property.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maintained_keys_include_descendants() {
        let maintain = vec!["tags".to_string()];
        assert!(is_maintained("tags", &maintain));
        assert!(is_maintained("tags.primary", &maintain));
        assert!(!is_maintained("tagsx", &maintain));
        assert!(!is_maintained("status.name", &maintain));
    }
}

//! Popularity ranking of resource identifiers.
//!
//! Ticket records name the people working on them in comma-separated
//! identifier lists (`"alice, bob"`). The ranker counts every identifier
//! across the configured record paths and offers them most-used first, which
//! makes it a natural [`OptionDeriver`] for a "who is this for" field.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use dispatch_model::{OptionDeriver, value_to_text};
use dispatch_query::lookup;

/// Record paths counted when no sources are configured.
pub const DEFAULT_RESOURCE_SOURCES: [&str; 2] = ["resources", "owner.identifier"];

/// Ranks resource identifiers by how many records mention them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRanker {
    sources: Vec<String>,
}

impl Default for ResourceRanker {
    fn default() -> Self {
        Self::new(DEFAULT_RESOURCE_SOURCES.map(String::from))
    }
}

impl ResourceRanker {
    pub fn new(sources: impl IntoIterator<Item = String>) -> Self {
        Self {
            sources: sources.into_iter().collect(),
        }
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Identifiers ordered by descending frequency, ties in locale order.
    ///
    /// A non-blank `current` that no record mentions is ranked with a count
    /// of zero, so the field's own value is always offered.
    pub fn rank(&self, records: &[Value], current: &str) -> Vec<String> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for record in records {
            for source in &self.sources {
                let Some(raw) = lookup(record, source) else {
                    continue;
                };
                for token in tokens(raw) {
                    *counts.entry(token).or_default() += 1;
                }
            }
        }

        let current = current.trim();
        if !current.is_empty() {
            counts.entry(current.to_string()).or_insert(0);
        }

        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        ranked.sort_by(|(a, a_count), (b, b_count)| {
            b_count.cmp(a_count).then_with(|| locale_cmp(a, b))
        });
        ranked.into_iter().map(|(token, _)| token).collect()
    }
}

impl OptionDeriver for ResourceRanker {
    fn derive(&self, records: &[Value], current: &Value) -> Vec<Value> {
        self.rank(records, &value_to_text(current))
            .into_iter()
            .map(Value::String)
            .collect()
    }
}

/// Trimmed, non-empty identifiers of one source value.
fn tokens(raw: &Value) -> Vec<String> {
    match raw {
        Value::String(list) => split_identifiers(list),
        Value::Array(items) => items.iter().flat_map(tokens).collect(),
        Value::Number(_) | Value::Bool(_) => vec![value_to_text(raw)],
        Value::Null | Value::Object(_) => Vec::new(),
    }
}

/// Splits a comma-separated identifier list.
pub fn split_identifiers(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Dictionary ordering for display names.
///
/// Accents and case are ignored first, so `"Émile"` sorts with the `e`s. Ties
/// fall back to accent-sensitive comparison, then lowercase before uppercase.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    fold(a)
        .cmp(&fold(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

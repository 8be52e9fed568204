//! Self-describing input fields.
//!
//! A [`Field`] is one user-editable input of the dispatch form. Its selectable
//! values are either a fixed list or derived from the live ticket records
//! every time they are requested.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Boolean,
    Select,
    Multiselect,
    /// A list of record references (e.g. the selected tickets).
    EntityList,
}

/// Computes a field's option list from the current records and value.
///
/// Implementations must keep `current` in their output when it is non-empty,
/// so a manually entered value stays selectable.
pub trait OptionDeriver: Send + Sync {
    fn derive(&self, records: &[Value], current: &Value) -> Vec<Value>;
}

impl<F> OptionDeriver for F
where
    F: Fn(&[Value], &Value) -> Vec<Value> + Send + Sync,
{
    fn derive(&self, records: &[Value], current: &Value) -> Vec<Value> {
        self(records, current)
    }
}

/// Where a field's selectable values come from.
#[derive(Clone, Default)]
pub enum ValueSource {
    /// Free input, no option list.
    #[default]
    None,
    /// A fixed option list.
    Static(Vec<Value>),
    /// Options recomputed from the live records on every request.
    Derived(Arc<dyn OptionDeriver>),
}

impl ValueSource {
    pub fn fixed<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Static(values.into_iter().map(Into::into).collect())
    }

    pub fn derived<D>(deriver: D) -> Self
    where
        D: OptionDeriver + 'static,
    {
        Self::Derived(Arc::new(deriver))
    }

    pub fn from_fn<F>(derive: F) -> Self
    where
        F: Fn(&[Value], &Value) -> Vec<Value> + Send + Sync + 'static,
    {
        Self::Derived(Arc::new(derive))
    }

    /// Resolves the option list against the given records and current value.
    ///
    /// Derived sources are never cached: each call sees the records it is
    /// handed.
    pub fn resolve(&self, records: &[Value], current: &Value) -> Vec<Value> {
        match self {
            Self::None => Vec::new(),
            Self::Static(values) => values.clone(),
            Self::Derived(deriver) => deriver.derive(records, current),
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(self, Self::Derived(_))
    }
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Static(values) => f.debug_tuple("Static").field(values).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// One input of the dispatch form.
#[derive(Debug, Clone)]
pub struct Field {
    /// Unique within a field model; also the key in the dispatch payload.
    pub id: String,
    /// Current value. `Value::Null` means "not set".
    pub value: Value,
    pub values: ValueSource,
    pub field_type: FieldType,
    pub required: bool,
    /// Whether values outside the option list are accepted.
    pub allow_custom: bool,
}

impl Field {
    pub fn new(id: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            value: Value::Null,
            values: ValueSource::None,
            field_type,
            required: false,
            allow_custom: false,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub fn with_values(mut self, values: ValueSource) -> Self {
        self.values = values;
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_allow_custom(mut self, allow_custom: bool) -> Self {
        self.allow_custom = allow_custom;
        self
    }

    /// Options for this field given the live records.
    pub fn options(&self, records: &[Value]) -> Vec<Value> {
        self.values.resolve(records, &self.value)
    }

    /// True when the value is set and not blank.
    pub fn has_value(&self) -> bool {
        !crate::is_empty_value(&self.value)
    }
}

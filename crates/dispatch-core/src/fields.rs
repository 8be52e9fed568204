//! The dispatch form's field collection.

use serde_json::{Map, Value};

use dispatch_model::{Field, ModelError};

/// Ordered, id-unique set of form fields.
///
/// Updates are persistent: [`FieldModel::set_value`] returns a new model and
/// leaves the receiver as it was.
#[derive(Debug, Clone, Default)]
pub struct FieldModel {
    fields: Vec<Field>,
}

impl FieldModel {
    /// Builds a model, rejecting duplicate field ids.
    pub fn new(fields: Vec<Field>) -> Result<Self, ModelError> {
        for (index, field) in fields.iter().enumerate() {
            if fields[..index].iter().any(|earlier| earlier.id == field.id) {
                return Err(ModelError::DuplicateFieldId(field.id.clone()));
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    /// Current value of a field, `None` for unknown ids.
    pub fn value(&self, id: &str) -> Option<&Value> {
        self.get(id).map(|field| &field.value)
    }

    /// Returns a model with field `id` set to `value`.
    ///
    /// Unknown ids yield an unchanged copy.
    #[must_use]
    pub fn set_value(&self, id: &str, value: Value) -> Self {
        self.update_value(id, |_| value)
    }

    /// Returns a model with field `id` replaced by `update(current)`.
    #[must_use]
    pub fn update_value(&self, id: &str, update: impl FnOnce(&Value) -> Value) -> Self {
        let mut fields = self.fields.clone();
        match fields.iter_mut().find(|field| field.id == id) {
            Some(field) => field.value = update(&field.value),
            None => tracing::debug!(field = id, "update of unknown field ignored"),
        }
        Self { fields }
    }

    /// Option list of field `id` against the given records.
    pub fn options(&self, id: &str, records: &[Value]) -> Vec<Value> {
        self.get(id)
            .map(|field| field.options(records))
            .unwrap_or_default()
    }

    /// Ids of required fields whose value is blank, in field order.
    pub fn missing_required(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|field| field.required && !field.has_value())
            .map(|field| field.id.clone())
            .collect()
    }

    /// Field values keyed by id.
    pub fn collect_params(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|field| (field.id.clone(), field.value.clone()))
            .collect()
    }
}

/// Resolves a field's option list for `records`, using `current` in place of
/// the field's stored value.
pub fn resolve_values(field: &Field, records: &[Value], current: &Value) -> Vec<Value> {
    field.values.resolve(records, current)
}

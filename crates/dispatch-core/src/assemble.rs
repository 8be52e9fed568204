//! Reduction of the form state into the outbound dispatch payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AssembleError;
use crate::fields::FieldModel;

/// Parameters of one dispatch call, keyed by field id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchPayload {
    pub params: Map<String, Value>,
}

/// Builds the dispatch payload from the current field values.
///
/// Every field contributes its value under its id. Fails without producing a
/// payload when a required field is blank.
pub fn assemble(fields: &FieldModel) -> Result<DispatchPayload, AssembleError> {
    let missing = fields.missing_required();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "dispatch payload rejected");
        return Err(AssembleError::MissingRequired { fields: missing });
    }
    let params = fields.collect_params();
    tracing::debug!(params = params.len(), "assembled dispatch payload");
    Ok(DispatchPayload { params })
}

//! Shared types of the ticket dispatch console.
//!
//! - [`Field`] / [`ValueSource`]: dispatch form inputs with static or
//!   record-derived option lists
//! - [`Column`] / [`CellSpec`]: table projections and their filter strategy
//! - [`FlatQuery`]: the dot-path keyed query handed to the search engine
//! - [`Preset`]: a named query snapshot with edit history

pub mod column;
pub mod error;
pub mod field;
pub mod ids;
pub mod preset;
pub mod query;

pub use column::{
    CellFormatter, CellSpec, CellTransform, Column, ExtraOption, FilterOption, FilterType,
    FormatContext, OptionBuilder,
};
pub use error::{ModelError, Result};
pub use field::{Field, FieldType, OptionDeriver, ValueSource};
pub use ids::PresetId;
pub use preset::{EditEntry, Preset};
pub use query::{FlatQuery, is_empty_value, value_to_text};

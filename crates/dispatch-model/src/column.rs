//! Column descriptors for the ticket table.
//!
//! A [`Column`] projects one dot-path of a ticket record into a flat cell.
//! The projected value feeds both display and filtering; formatting is a
//! display concern only and never takes part in matching.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Match strategy used when filtering on a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Whitespace-separated terms, each a case-insensitive substring.
    #[default]
    Text,
    /// Exact membership in a list of allowed values.
    Dropdown,
    /// Filtered by the caller; always matches here.
    Custom,
    /// Not filterable.
    None,
}

/// Turns a raw record value into the cell value used for display and filtering.
pub trait CellTransform: Send + Sync {
    fn resolve(&self, value: &Value) -> Value;
}

impl<F> CellTransform for F
where
    F: Fn(&Value) -> Value + Send + Sync,
{
    fn resolve(&self, value: &Value) -> Value {
        self(value)
    }
}

/// Context handed to formatters.
#[derive(Debug, Clone, Copy)]
pub struct FormatContext<'a> {
    /// Column property being formatted.
    pub property: &'a str,
    /// The full source record of the row.
    pub row_data: &'a Value,
}

/// Display formatter; formatters of a column run in order, each receiving the
/// previous output.
pub trait CellFormatter: Send + Sync {
    fn format(&self, value: &Value, ctx: &FormatContext<'_>) -> Value;
}

impl<F> CellFormatter for F
where
    F: Fn(&Value, &FormatContext<'_>) -> Value + Send + Sync,
{
    fn format(&self, value: &Value, ctx: &FormatContext<'_>) -> Value {
        self(value, ctx)
    }
}

/// Per-column cell behavior.
#[derive(Clone, Default)]
pub struct CellSpec {
    pub resolve: Option<Arc<dyn CellTransform>>,
    pub formatters: Vec<Arc<dyn CellFormatter>>,
}

impl CellSpec {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_resolve<F>(mut self, resolve: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.resolve = Some(Arc::new(resolve));
        self
    }

    #[must_use]
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Value, &FormatContext<'_>) -> Value + Send + Sync + 'static,
    {
        self.formatters.push(Arc::new(formatter));
        self
    }
}

impl fmt::Debug for CellSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellSpec")
            .field("resolve", &self.resolve.is_some())
            .field("formatters", &self.formatters.len())
            .finish()
    }
}

/// An entry of a dropdown filter's option list.
///
/// `value` is either a single raw value or a list of raw values; selecting a
/// list option selects every value in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: Value,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Builds an extra option from the column and its distinct row values.
pub trait OptionBuilder: Send + Sync {
    fn build(&self, column: &Column, distinct: &[Value]) -> FilterOption;
}

impl<F> OptionBuilder for F
where
    F: Fn(&Column, &[Value]) -> FilterOption + Send + Sync,
{
    fn build(&self, column: &Column, distinct: &[Value]) -> FilterOption {
        self(column, distinct)
    }
}

/// Option shown ahead of a dropdown's distinct values.
#[derive(Clone)]
pub enum ExtraOption {
    Static(FilterOption),
    Derived(Arc<dyn OptionBuilder>),
}

impl ExtraOption {
    pub fn from_fn<F>(build: F) -> Self
    where
        F: Fn(&Column, &[Value]) -> FilterOption + Send + Sync + 'static,
    {
        Self::Derived(Arc::new(build))
    }

    pub fn evaluate(&self, column: &Column, distinct: &[Value]) -> FilterOption {
        match self {
            Self::Static(option) => option.clone(),
            Self::Derived(builder) => builder.build(column, distinct),
        }
    }
}

impl fmt::Debug for ExtraOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(option) => f.debug_tuple("Static").field(option).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// A projection of ticket records used for display and filtering.
#[derive(Debug, Clone)]
pub struct Column {
    /// Dot-path into the record, e.g. `status.name`. Also the query key.
    pub property: String,
    pub header: String,
    pub visible: bool,
    pub cell: Option<CellSpec>,
    pub filter_type: FilterType,
    pub extra_options: Vec<ExtraOption>,
}

impl Column {
    pub fn new(property: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            header: header.into(),
            visible: true,
            cell: None,
            filter_type: FilterType::default(),
            extra_options: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter_type: FilterType) -> Self {
        self.filter_type = filter_type;
        self
    }

    #[must_use]
    pub fn with_cell(mut self, cell: CellSpec) -> Self {
        self.cell = Some(cell);
        self
    }

    #[must_use]
    pub fn with_extra_option(mut self, option: ExtraOption) -> Self {
        self.extra_options.push(option);
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

//! Query engine of the ticket dispatch console.
//!
//! Records flow through three stages:
//!
//! 1. [`resolve_rows`] projects raw JSON records through the column list
//!    (dot-path lookup plus per-column transforms), once per snapshot.
//! 2. [`filter_rows`] applies the active [`FlatQuery`] column by column
//!    (multi-infix text, exact dropdown membership), AND-combined.
//! 3. [`merge`] builds the next query from the previous one, either as an
//!    overlay or a wholesale replacement.
//!
//! [`flatten`] / [`unflatten`] convert between the nested query form stored
//! in presets and the dot-path form used here.
//!
//! [`FlatQuery`]: dispatch_model::FlatQuery

#![deny(unsafe_code)]

pub mod columns;
pub mod flat;
pub mod merge;
pub mod options;
pub mod path;
pub mod resolve;
pub mod search;

pub use columns::{toggle_column, visible_columns};
pub use flat::{flatten, unflatten};
pub use merge::{merge, set_filter};
pub use options::{distinct_values, dropdown_selection, ranked_options_for_column};
pub use path::{lookup, value_at};
pub use resolve::{ResolvedRow, format_cell, resolve_cell, resolve_rows};
pub use search::{column_matches, dropdown_match, filter_rows, multi_infix, row_matches};

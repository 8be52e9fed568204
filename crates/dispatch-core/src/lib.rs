//! Console engine of the ticket dispatch console.
//!
//! - [`FieldModel`]: the dispatch form, with persistent value updates and the
//!   ticket selection held in its `tickets` field
//! - [`ResourceRanker`]: most-used-first option list for the assignee field
//! - [`assemble`]: form values to [`DispatchPayload`], with required-field
//!   validation
//! - [`DispatchConsole`]: the session state container wiring fields, tickets,
//!   query, presets and dispatch status together
//! - [`collab`]: injected store, importer and executor interfaces

#![deny(unsafe_code)]

pub mod assemble;
pub mod collab;
pub mod config;
pub mod console;
pub mod defaults;
pub mod error;
pub mod fields;
pub mod ranker;
pub mod selection;
pub mod tickets;

pub use assemble::{DispatchPayload, assemble};
pub use collab::{
    Collection, DispatchExecutor, MemoryStore, PresetSink, Revision, Snapshot, SnapshotListener,
    SnapshotSource, Subscription, SubscriptionId, TicketImporter, TicketSink, import_project,
};
pub use config::ConsoleConfig;
pub use console::{
    ConsoleBindings, DispatchConsole, DispatchStatus, SharedConsole, bind, remove_selected_preset,
    save_preset, share, update_selected_preset,
};
pub use defaults::{ACTION_PROPERTY, action_cell, dispatch_columns, dispatch_fields};
pub use error::{AssembleError, ConfigError, ConsoleError, DispatchError, ImportError, StoreError};
pub use fields::{FieldModel, resolve_values};
pub use ranker::{DEFAULT_RESOURCE_SOURCES, ResourceRanker, locale_cmp, split_identifiers};
pub use selection::TICKETS_FIELD;
pub use tickets::TicketPool;

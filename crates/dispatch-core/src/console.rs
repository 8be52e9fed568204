//! The dispatch console's state container.
//!
//! [`DispatchConsole`] owns everything a console session shows: the form
//! fields, the ticket table and its query, the preset list and the dispatch
//! status. Every transition runs through a method here, and derived state
//! (resolved rows) is recomputed whenever its inputs change.
//!
//! Sessions that receive snapshots from a store share the console as a
//! [`SharedConsole`] and wire it up with [`bind`].

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use dispatch_model::{Column, FilterOption, FlatQuery, ModelError, PresetId};
use dispatch_presets::{PresetStore, load};
use dispatch_query::{
    ResolvedRow, filter_rows, merge, ranked_options_for_column, resolve_rows, set_filter,
    toggle_column, unflatten,
};

use crate::assemble::{DispatchPayload, assemble};
use crate::collab::{
    Collection, DispatchExecutor, PresetSink, Revision, Snapshot, SnapshotListener,
    SnapshotSource, Subscription,
};
use crate::config::ConsoleConfig;
use crate::defaults::{ACTION_PROPERTY, action_cell, dispatch_columns, dispatch_fields};
use crate::error::{AssembleError, ConsoleError, DispatchError};
use crate::fields::FieldModel;
use crate::ranker::ResourceRanker;
use crate::tickets::TicketPool;

/// Progress of the last dispatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispatchStatus {
    pub in_progress: bool,
    pub response: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct DispatchConsole {
    config: ConsoleConfig,
    fields: FieldModel,
    columns: Vec<Column>,
    tickets: TicketPool,
    rows: Vec<ResolvedRow>,
    query: FlatQuery,
    presets: PresetStore,
    selected_preset: Option<PresetId>,
    status: DispatchStatus,
    tickets_revision: Option<Revision>,
    presets_revision: Option<Revision>,
}

impl DispatchConsole {
    pub fn new(config: ConsoleConfig, fields: FieldModel, columns: Vec<Column>) -> Self {
        Self {
            config,
            fields,
            columns,
            tickets: TicketPool::default(),
            rows: Vec::new(),
            query: FlatQuery::new(),
            presets: PresetStore::new(),
            selected_preset: None,
            status: DispatchStatus::default(),
            tickets_revision: None,
            presets_revision: None,
        }
    }

    /// Console with the stock dispatch form and ticket table.
    pub fn standard(config: ConsoleConfig, today: NaiveDate) -> Result<Self, ModelError> {
        let ranker = ResourceRanker::new(config.resource_sources.iter().cloned());
        let fields = FieldModel::new(dispatch_fields(today, ranker))?;
        let columns = dispatch_columns(&config.closed_statuses);
        Ok(Self::new(config, fields, columns))
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn fields(&self) -> &FieldModel {
        &self.fields
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn tickets(&self) -> &TicketPool {
        &self.tickets
    }

    pub fn rows(&self) -> &[ResolvedRow] {
        &self.rows
    }

    pub fn query(&self) -> &FlatQuery {
        &self.query
    }

    pub fn presets(&self) -> &PresetStore {
        &self.presets
    }

    pub fn selected_preset(&self) -> Option<&PresetId> {
        self.selected_preset.as_ref()
    }

    pub fn dispatch_status(&self) -> &DispatchStatus {
        &self.status
    }

    /// Applies a pushed snapshot unless one with a later revision of the same
    /// collection was already applied. Returns whether it was applied.
    pub fn apply_snapshot(&mut self, revision: Revision, snapshot: Snapshot) -> bool {
        let collection = snapshot.collection();
        let last = match collection {
            Collection::Tickets => &mut self.tickets_revision,
            Collection::Presets => &mut self.presets_revision,
        };
        if last.is_some_and(|last| revision <= last) {
            tracing::debug!(?collection, revision = revision.0, "stale snapshot dropped");
            return false;
        }
        *last = Some(revision);
        match snapshot {
            Snapshot::Tickets(pool) => self.set_tickets(pool),
            Snapshot::Presets(store) => self.set_presets(store),
        }
        true
    }

    /// Forgets applied revisions, for binding to a new source.
    fn reset_revisions(&mut self) {
        self.tickets_revision = None;
        self.presets_revision = None;
    }

    pub fn set_tickets(&mut self, pool: TicketPool) {
        self.rows = resolve_rows(pool.records(), &self.columns);
        self.tickets = pool;
    }

    /// Replaces the preset list. A selected preset that is gone is deselected.
    pub fn set_presets(&mut self, store: PresetStore) {
        if let Some(id) = &self.selected_preset
            && !store.contains(id.as_str())
        {
            tracing::debug!(preset = %id, "selected preset no longer exists");
            self.selected_preset = None;
        }
        self.presets = store;
    }

    /// Merges `partial` into the active query (see [`merge`]).
    pub fn search(&mut self, partial: &FlatQuery, incremental: bool) {
        self.query = merge(&self.query, partial, incremental);
    }

    /// Sets one filter, keeping the others.
    pub fn set_filter(&mut self, property: &str, value: Value) {
        self.query = set_filter(&self.query, property, value);
    }

    /// Rows matching the active query, in ticket order.
    pub fn filtered_rows(&self) -> Vec<&ResolvedRow> {
        filter_rows(&self.rows, &self.columns, &self.query)
    }

    /// Tickets matching the active query, in ticket order.
    pub fn filtered_tickets(&self) -> Vec<&Value> {
        let records = self.tickets.records();
        self.filtered_rows()
            .into_iter()
            .filter_map(|row| records.get(row.source))
            .collect()
    }

    /// Dropdown options of a column; empty for unknown properties.
    pub fn column_options(&self, property: &str) -> Vec<FilterOption> {
        self.columns
            .iter()
            .find(|column| column.property == property)
            .map(|column| ranked_options_for_column(column, &self.rows))
            .unwrap_or_default()
    }

    pub fn toggle_column(&mut self, property: &str) {
        self.columns = toggle_column(&self.columns, property);
    }

    /// Visible columns, with the action column reflecting the selection.
    pub fn display_columns(&self) -> Vec<Column> {
        let selected = self.fields.selected_ticket_ids();
        self.columns
            .iter()
            .filter(|column| column.visible)
            .map(|column| {
                if column.property == ACTION_PROPERTY {
                    column.clone().with_cell(action_cell(selected.clone()))
                } else {
                    column.clone()
                }
            })
            .collect()
    }

    pub fn set_field_value(&mut self, id: &str, value: Value) {
        self.fields = self.fields.set_value(id, value);
    }

    /// Options of a form field against the live tickets.
    pub fn field_options(&self, id: &str) -> Vec<Value> {
        self.fields.options(id, self.tickets.records())
    }

    pub fn toggle_ticket(&mut self, id: &Value) {
        self.fields = self.fields.toggle_ticket(id);
    }

    /// Selects every ticket matching the active query.
    pub fn add_filtered(&mut self) {
        let next = {
            let rows = self.filtered_rows();
            self.fields.add_filtered(self.tickets.records(), &rows)
        };
        self.fields = next;
    }

    pub fn reset_tickets(&mut self) {
        self.fields = self.fields.reset_tickets();
    }

    pub fn set_ticket_hours(&mut self, id: &Value, hours: Value) {
        self.fields = self.fields.set_ticket_hours(id, hours);
    }

    pub fn selected_tickets(&self) -> Vec<&Value> {
        self.fields.selected_tickets(self.tickets.records())
    }

    /// Selects a preset and replaces the query with its contents.
    ///
    /// The maintained properties keep their current values. Loading `None`
    /// or an unknown id clears the selection and the query.
    pub fn load_preset(&mut self, id: Option<&str>) {
        let preset = id.and_then(|id| self.presets.get(id));
        self.selected_preset = preset.map(|preset| preset.id.clone());
        let next = load(preset, &self.query, &self.config.maintain_depth);
        self.search(&next, false);
    }

    /// The active query in nested form, as stored in presets.
    pub fn query_snapshot(&self) -> Value {
        unflatten(&self.query)
    }

    /// Preset list with the active query saved under `label`.
    pub fn with_new_preset(&self, label: &str, actor: &str) -> PresetStore {
        self.presets.add(label, self.query_snapshot(), actor)
    }

    /// Preset list with the selected preset overwritten by the active query.
    pub fn with_updated_preset(&self, actor: &str) -> Result<PresetStore, ConsoleError> {
        let id = self
            .selected_preset
            .as_ref()
            .ok_or(ConsoleError::NoPresetSelected)?;
        Ok(self.presets.update(id.as_str(), self.query_snapshot(), actor))
    }

    /// Preset list without the selected preset.
    pub fn without_selected_preset(&self) -> Result<PresetStore, ConsoleError> {
        let id = self
            .selected_preset
            .as_ref()
            .ok_or(ConsoleError::NoPresetSelected)?;
        Ok(self.presets.remove(id.as_str()))
    }

    pub fn assemble(&self) -> Result<DispatchPayload, AssembleError> {
        assemble(&self.fields)
    }

    /// Validates the form and marks a dispatch as in progress.
    pub fn begin_dispatch(&mut self) -> Result<DispatchPayload, DispatchError> {
        if self.status.in_progress {
            return Err(DispatchError::InProgress);
        }
        let payload = self.assemble()?;
        self.status = DispatchStatus {
            in_progress: true,
            response: None,
        };
        tracing::info!(params = payload.params.len(), "dispatch started");
        Ok(payload)
    }

    /// Records the outcome of the dispatch started by [`Self::begin_dispatch`].
    pub fn finish_dispatch(&mut self, result: &Result<Value, DispatchError>) {
        self.status.in_progress = false;
        match result {
            Ok(response) => {
                tracing::info!("dispatch finished");
                self.status.response = Some(response.clone());
            }
            Err(error) => tracing::error!(%error, "dispatch failed"),
        }
    }

    /// Assembles the payload and runs it through `executor`.
    pub fn dispatch(&mut self, executor: &dyn DispatchExecutor) -> Result<Value, DispatchError> {
        let payload = self.begin_dispatch()?;
        let result = executor.execute(&payload);
        self.finish_dispatch(&result);
        result
    }

    /// "N tickets from M projects".
    pub fn ticket_summary(&self) -> String {
        self.tickets.summary()
    }
}

pub type SharedConsole = Arc<Mutex<DispatchConsole>>;

pub fn share(console: DispatchConsole) -> SharedConsole {
    Arc::new(Mutex::new(console))
}

fn lock(console: &SharedConsole) -> Result<MutexGuard<'_, DispatchConsole>, ConsoleError> {
    console.lock().map_err(|_| ConsoleError::Poisoned)
}

/// Subscriptions feeding a shared console. Dropping them stops the updates.
#[derive(Debug)]
pub struct ConsoleBindings {
    _tickets: Subscription,
    _presets: Subscription,
}

/// Subscribes the console to ticket and preset snapshots from `source`.
pub fn bind(console: &SharedConsole, source: &Arc<dyn SnapshotSource>) -> ConsoleBindings {
    match console.lock() {
        Ok(mut console) => console.reset_revisions(),
        Err(_) => tracing::error!("console lock poisoned, revisions not reset"),
    }
    ConsoleBindings {
        _tickets: Subscription::new(
            Arc::clone(source),
            Collection::Tickets,
            listener(Arc::downgrade(console)),
        ),
        _presets: Subscription::new(
            Arc::clone(source),
            Collection::Presets,
            listener(Arc::downgrade(console)),
        ),
    }
}

fn listener(console: Weak<Mutex<DispatchConsole>>) -> SnapshotListener {
    Arc::new(move |revision: Revision, snapshot: Snapshot| {
        let Some(console) = console.upgrade() else {
            return;
        };
        match console.lock() {
            Ok(mut console) => {
                console.apply_snapshot(revision, snapshot);
            }
            Err(_) => tracing::error!("console lock poisoned, snapshot dropped"),
        }
    })
}

/// Saves the active query as a new preset through `sink`.
pub fn save_preset(
    console: &SharedConsole,
    sink: &dyn PresetSink,
    label: &str,
    actor: &str,
) -> Result<(), ConsoleError> {
    let next = lock(console)?.with_new_preset(label, actor);
    sink.put_presets(next)?;
    Ok(())
}

/// Overwrites the selected preset with the active query through `sink`.
pub fn update_selected_preset(
    console: &SharedConsole,
    sink: &dyn PresetSink,
    actor: &str,
) -> Result<(), ConsoleError> {
    let next = lock(console)?.with_updated_preset(actor)?;
    sink.put_presets(next)?;
    Ok(())
}

/// Deletes the selected preset through `sink`.
pub fn remove_selected_preset(
    console: &SharedConsole,
    sink: &dyn PresetSink,
) -> Result<(), ConsoleError> {
    let next = lock(console)?.without_selected_preset()?;
    sink.put_presets(next)?;
    Ok(())
}

//! Console state transitions, ticket selection and store wiring.

use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use chrono::NaiveDate;
use serde_json::{Value, json};

use dispatch_core::{
    Collection, ConsoleConfig, ConsoleError, DispatchConsole, DispatchError, DispatchExecutor,
    DispatchPayload, ImportError, MemoryStore, PresetSink, Revision, Snapshot, SnapshotSource,
    Subscription, TicketImporter, TicketPool, TicketSink, bind, import_project,
    remove_selected_preset, save_preset, share, update_selected_preset,
};
use dispatch_model::{FilterOption, FlatQuery};
use dispatch_presets::PresetStore;
use dispatch_query::format_cell;

fn tickets() -> TicketPool {
    TicketPool::from_value(json!({
        "p1": [
            {"id": 1, "summary": "Summary 123", "status": {"name": "Open"},
             "phase": {"path": "Build", "name": "Build phase"}, "resources": "amy, bob"},
            {"id": 2, "summary": "Fix login", "status": {"name": "New"}, "resources": "amy"},
        ],
        "p2": [
            {"id": 3, "summary": "Old work", "status": {"name": "Closed"}},
            {"id": 4, "summary": "Summary 9", "status": {"name": "Open"}},
        ]
    }))
}

fn console() -> DispatchConsole {
    let mut console = DispatchConsole::standard(
        ConsoleConfig::default(),
        NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
    )
    .unwrap();
    console.set_tickets(tickets());
    console
}

fn query(pairs: &[(&str, Value)]) -> FlatQuery {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}

fn ids(records: &[&Value]) -> Vec<i64> {
    records.iter().filter_map(|record| record["id"].as_i64()).collect()
}

#[test]
fn summary_counts_tickets_and_projects() {
    assert_eq!(console().ticket_summary(), "4 tickets from 2 projects");
}

#[test]
fn flat_ticket_list_is_one_project() {
    let pool = TicketPool::from_value(json!([{"id": 1}, {"id": 2}]));
    assert_eq!(pool.summary(), "2 tickets from 1 projects");
    assert_eq!(TicketPool::from_value(json!([])).summary(), "0 tickets from 0 projects");
}

#[test]
fn search_filters_tickets() {
    let mut console = console();
    console.search(&query(&[("summary", json!("sum"))]), true);
    assert_eq!(ids(&console.filtered_tickets()), vec![1, 4]);

    console.set_filter("status.name", json!(["New"]));
    assert!(console.filtered_tickets().is_empty());

    console.search(&query(&[("status.name", json!(["Open"]))]), false);
    assert_eq!(ids(&console.filtered_tickets()), vec![1, 4]);
    assert!(!console.query().contains_key("summary"));
}

#[test]
fn status_options_offer_open_and_complete_groups() {
    let options = console().column_options("status.name");
    assert_eq!(
        options,
        vec![
            FilterOption::new("All Open", json!(["Open", "New"])),
            FilterOption::new("All Complete", json!(["Closed", "Completed", "Cancelled"])),
            FilterOption::new("Open", "Open"),
            FilterOption::new("New", "New"),
            FilterOption::new("Closed", "Closed"),
        ]
    );
}

#[test]
fn phase_column_resolves_path_and_shows_name() {
    let console = console();
    let row = &console.rows()[0];
    assert_eq!(row.cell("phase.path"), &json!("(Build)"));

    let column = console
        .columns()
        .iter()
        .find(|column| column.property == "phase.path")
        .unwrap();
    let record = &console.tickets().records()[0];
    assert_eq!(format_cell(row, column, record), "Build phase");
}

#[test]
fn toggle_ticket_selects_and_deselects() {
    let mut console = console();
    console.toggle_ticket(&json!(2));
    console.toggle_ticket(&json!(4));
    assert_eq!(ids(&console.selected_tickets()), vec![2, 4]);

    console.toggle_ticket(&json!("2"));
    assert_eq!(ids(&console.selected_tickets()), vec![4]);
}

#[test]
fn add_filtered_appends_only_new_ids() {
    let mut console = console();
    console.toggle_ticket(&json!(4));
    console.set_filter("status.name", json!(["Open"]));
    console.add_filtered();

    assert_eq!(console.fields().selected_ticket_ids(), vec!["4", "1"]);

    console.reset_tickets();
    assert!(console.selected_tickets().is_empty());
}

#[test]
fn ticket_hours_apply_to_selected_entry() {
    let mut console = console();
    console.toggle_ticket(&json!(1));
    console.set_ticket_hours(&json!(1), json!(3));
    console.set_ticket_hours(&json!(9), json!(5));

    assert_eq!(
        console.fields().value("tickets"),
        Some(&json!([{"id": 1, "hours": 3}]))
    );
}

#[test]
fn action_column_follows_selection() {
    let mut console = console();
    console.toggle_ticket(&json!(1));

    let columns = console.display_columns();
    let action = columns
        .iter()
        .find(|column| column.property == "mobileGuid")
        .unwrap();
    let records = console.tickets().records();
    let rows = console.rows();
    assert_eq!(format_cell(&rows[0], action, &records[0]), "Remove");
    assert_eq!(format_cell(&rows[1], action, &records[1]), "Add");
}

#[test]
fn hidden_columns_are_not_displayed() {
    let mut console = console();
    console.toggle_column("company.name");
    assert!(
        console
            .display_columns()
            .iter()
            .all(|column| column.property != "company.name")
    );
    console.toggle_column("company.name");
    assert_eq!(console.display_columns().len(), console.columns().len());
}

#[test]
fn member_options_come_from_tickets() {
    let console = console();
    assert_eq!(
        console.field_options("memberIdentifier"),
        vec![json!("amy"), json!("bob")]
    );
}

#[test]
fn preset_round_trip_keeps_maintained_tags() {
    let mut console = console();
    console.search(
        &query(&[("status.name", json!(["Open"])), ("tags", json!(["old"]))]),
        false,
    );
    let store = console.with_new_preset("open work", "lee");
    let id = store.presets()[0].id.clone();
    console.set_presets(store);

    console.search(&query(&[("tags", json!(["new"]))]), false);
    console.load_preset(Some(id.as_str()));

    assert_eq!(console.selected_preset(), Some(&id));
    assert_eq!(
        console.query(),
        &query(&[("status.name", json!(["Open"])), ("tags", json!(["new"]))])
    );
}

#[test]
fn loading_no_preset_clears_query() {
    let mut console = console();
    console.set_filter("summary", json!("sum"));
    console.load_preset(None);
    assert!(console.query().is_empty());
    assert!(console.selected_preset().is_none());
}

#[test]
fn preset_edits_need_a_selection() {
    let console = console();
    assert!(matches!(
        console.with_updated_preset("lee"),
        Err(ConsoleError::NoPresetSelected)
    ));
    assert!(matches!(
        console.without_selected_preset(),
        Err(ConsoleError::NoPresetSelected)
    ));
}

struct Echo;

impl DispatchExecutor for Echo {
    fn execute(&self, payload: &DispatchPayload) -> Result<Value, DispatchError> {
        Ok(json!({"scheduled": payload.params["tickets"]}))
    }
}

struct Failing;

impl DispatchExecutor for Failing {
    fn execute(&self, _: &DispatchPayload) -> Result<Value, DispatchError> {
        Err(DispatchError::Execution("remote unavailable".to_string()))
    }
}

#[test]
fn dispatch_requires_valid_form() {
    let mut console = console();
    let err = console.dispatch(&Echo).unwrap_err();
    assert!(matches!(err, DispatchError::Invalid(_)));
    assert!(!console.dispatch_status().in_progress);
}

#[test]
fn dispatch_records_response() {
    let mut console = console();
    console.set_field_value("memberIdentifier", json!("amy"));
    console.toggle_ticket(&json!(1));

    let response = console.dispatch(&Echo).unwrap();
    assert_eq!(response, json!({"scheduled": [{"id": 1}]}));
    assert!(!console.dispatch_status().in_progress);
    assert_eq!(console.dispatch_status().response, Some(response));
}

#[test]
fn dispatch_in_progress_rejects_another() {
    let mut console = console();
    console.set_field_value("memberIdentifier", json!("amy"));
    console.toggle_ticket(&json!(1));

    console.begin_dispatch().unwrap();
    assert!(console.dispatch_status().in_progress);
    assert!(matches!(
        console.begin_dispatch(),
        Err(DispatchError::InProgress)
    ));

    let failed = console.dispatch(&Failing);
    assert!(matches!(failed, Err(DispatchError::InProgress)));
    console.finish_dispatch(&Failing.execute(&console.assemble().unwrap()));
    assert!(!console.dispatch_status().in_progress);
    assert!(console.dispatch_status().response.is_none());
}

struct FakeImporter {
    calls: Cell<usize>,
}

impl TicketImporter for FakeImporter {
    fn fetch_tickets(&self, project_id: &str) -> Result<Vec<Value>, ImportError> {
        self.calls.set(self.calls.get() + 1);
        if project_id == "missing" {
            return Err(ImportError::Fetch {
                project_id: project_id.to_string(),
                message: "not found".to_string(),
            });
        }
        Ok(vec![json!({"id": format!("{project_id}-1")})])
    }
}

#[test]
fn bound_console_follows_store_snapshots() {
    let store = Arc::new(MemoryStore::with_tickets(tickets()));
    let source: Arc<dyn SnapshotSource> = store.clone();
    let shared = share(
        DispatchConsole::standard(
            ConsoleConfig::default(),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        )
        .unwrap(),
    );

    let bindings = bind(&shared, &source);
    assert_eq!(store.listener_count(), 2);
    assert_eq!(shared.lock().unwrap().tickets().len(), 4);

    let importer = FakeImporter { calls: Cell::new(0) };
    let count = import_project(&importer, &*store, "p3").unwrap();
    assert_eq!(count, 1);
    assert_eq!(
        shared.lock().unwrap().ticket_summary(),
        "5 tickets from 3 projects"
    );

    save_preset(&shared, &*store, "mine", "lee").unwrap();
    let id = store.presets().presets()[0].id.clone();
    assert!(shared.lock().unwrap().presets().contains(id.as_str()));

    shared.lock().unwrap().load_preset(Some(id.as_str()));
    update_selected_preset(&shared, &*store, "kim").unwrap();
    assert_eq!(store.presets().presets()[0].edit_history.len(), 2);

    remove_selected_preset(&shared, &*store).unwrap();
    assert!(store.presets().is_empty());
    assert!(shared.lock().unwrap().selected_preset().is_none());

    drop(bindings);
    assert_eq!(store.listener_count(), 0);
    store
        .put_project_tickets("p4", vec![json!({"id": 9})])
        .unwrap();
    assert_eq!(shared.lock().unwrap().tickets().len(), 5);
}

#[test]
fn failed_import_stores_nothing() {
    let store = MemoryStore::new();
    let importer = FakeImporter { calls: Cell::new(0) };
    let err = import_project(&importer, &store, "missing").unwrap_err();

    assert!(matches!(err, ImportError::Fetch { .. }));
    assert_eq!(importer.calls.get(), 1);
    assert!(store.tickets().is_empty());
}

#[test]
fn stale_snapshot_is_not_applied() {
    let mut console = console();
    let newer = PresetStore::new().add("newer", json!({}), "lee");

    assert!(console.apply_snapshot(Revision(2), Snapshot::Presets(newer)));
    assert!(!console.apply_snapshot(Revision(1), Snapshot::Presets(PresetStore::new())));
    assert_eq!(console.presets().len(), 1);

    assert!(console.apply_snapshot(Revision(1), Snapshot::Tickets(TicketPool::default())));
    assert!(console.tickets().is_empty());
}

#[test]
fn racing_writes_leave_console_on_latest_presets() {
    let store = Arc::new(MemoryStore::new());
    let source: Arc<dyn SnapshotSource> = store.clone();
    let one = PresetStore::new().add("first", json!({}), "lee");
    let two = one.add("second", json!({}), "kim");

    // Reacts to the first write by finishing a second write on another
    // thread before the console has seen the first one.
    let weak = Arc::downgrade(&store);
    let fired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&fired);
    let _writer = Subscription::new(
        Arc::clone(&source),
        Collection::Presets,
        Arc::new(move |_: Revision, snapshot: Snapshot| {
            let Snapshot::Presets(presets) = snapshot else {
                return;
            };
            if presets.len() != 1 || flag.swap(true, Ordering::SeqCst) {
                return;
            }
            let Some(store) = weak.upgrade() else {
                return;
            };
            let newer = two.clone();
            thread::spawn(move || store.put_presets(newer))
                .join()
                .unwrap()
                .unwrap();
        }),
    );
    let shared = share(console());
    let _bindings = bind(&shared, &source);

    store.put_presets(one).unwrap();

    assert!(fired.load(Ordering::SeqCst));
    assert_eq!(store.presets().len(), 2);
    assert_eq!(shared.lock().unwrap().presets().len(), 2);
}

//! Collaborators of the console: the snapshot store, ticket import and
//! dispatch execution.
//!
//! The console never reaches for a global store. Callers inject a
//! [`SnapshotSource`] and hold the returned [`Subscription`] for as long as
//! they want updates; dropping it unsubscribes.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use dispatch_presets::PresetStore;

use crate::assemble::DispatchPayload;
use crate::error::{DispatchError, ImportError, StoreError};
use crate::tickets::TicketPool;

/// Collections a source publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Tickets,
    Presets,
}

/// A full copy of one collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Tickets(TicketPool),
    Presets(PresetStore),
}

impl Snapshot {
    pub fn collection(&self) -> Collection {
        match self {
            Self::Tickets(_) => Collection::Tickets,
            Self::Presets(_) => Collection::Presets,
        }
    }
}

/// Position of a snapshot in its source's write order.
///
/// Every write to a source gets a higher revision than the one before, so a
/// consumer that sees snapshots out of order keeps the latest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision(pub u64);

pub type SnapshotListener = Arc<dyn Fn(Revision, Snapshot) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Pushes collection snapshots to subscribers.
///
/// A new subscriber receives the current snapshot right away, then one per
/// change. Deliveries may race across writing threads; consumers order them
/// by [`Revision`].
pub trait SnapshotSource: Send + Sync {
    fn subscribe(&self, collection: Collection, listener: SnapshotListener) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Live subscription; unsubscribes when dropped.
pub struct Subscription {
    source: Arc<dyn SnapshotSource>,
    id: SubscriptionId,
}

impl Subscription {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        collection: Collection,
        listener: SnapshotListener,
    ) -> Self {
        let id = source.subscribe(collection, listener);
        Self { source, id }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.source.unsubscribe(self.id);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Fetches a project's tickets from the ticketing system.
pub trait TicketImporter {
    fn fetch_tickets(&self, project_id: &str) -> Result<Vec<Value>, ImportError>;
}

/// Stores a project's tickets.
pub trait TicketSink {
    fn put_project_tickets(&self, project_id: &str, tickets: Vec<Value>)
    -> Result<(), StoreError>;
}

/// Stores the preset collection.
pub trait PresetSink {
    fn put_presets(&self, presets: PresetStore) -> Result<(), StoreError>;
}

/// Runs a dispatch and returns the remote response.
pub trait DispatchExecutor {
    fn execute(&self, payload: &DispatchPayload) -> Result<Value, DispatchError>;
}

/// Fetches one project's tickets and stores them. Returns the ticket count.
pub fn import_project(
    importer: &dyn TicketImporter,
    sink: &dyn TicketSink,
    project_id: &str,
) -> Result<usize, ImportError> {
    let tickets = importer.fetch_tickets(project_id)?;
    let count = tickets.len();
    sink.put_project_tickets(project_id, tickets)
        .map_err(|source| ImportError::Store {
            project_id: project_id.to_string(),
            source,
        })?;
    tracing::info!(project = project_id, tickets = count, "imported project tickets");
    Ok(count)
}

#[derive(Default)]
struct MemoryState {
    tickets: TicketPool,
    presets: PresetStore,
    listeners: Vec<(SubscriptionId, Collection, SnapshotListener)>,
    next_id: u64,
    revision: u64,
}

impl MemoryState {
    fn snapshot(&self, collection: Collection) -> Snapshot {
        match collection {
            Collection::Tickets => Snapshot::Tickets(self.tickets.clone()),
            Collection::Presets => Snapshot::Presets(self.presets.clone()),
        }
    }

    /// Bumps the revision and captures what a write publishes. Must run in
    /// the same critical section as the write.
    fn commit(&mut self, collection: Collection) -> Delivery {
        self.revision += 1;
        Delivery {
            collection,
            revision: Revision(self.revision),
            snapshot: self.snapshot(collection),
            listeners: self
                .listeners
                .iter()
                .filter(|(_, subscribed, _)| *subscribed == collection)
                .map(|(_, _, listener)| Arc::clone(listener))
                .collect(),
        }
    }
}

/// A committed write waiting to be handed to its listeners.
struct Delivery {
    collection: Collection,
    revision: Revision,
    snapshot: Snapshot,
    listeners: Vec<SnapshotListener>,
}

impl Delivery {
    fn send(self) {
        tracing::debug!(
            collection = ?self.collection,
            revision = self.revision.0,
            listeners = self.listeners.len(),
            "publishing snapshot"
        );
        for listener in &self.listeners {
            listener(self.revision, self.snapshot.clone());
        }
    }
}

/// In-process store implementing every sink and the snapshot source.
///
/// Listeners run on the writing thread after the store's lock is released.
/// Each write's snapshot and revision are captured together with the write.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tickets(tickets: TicketPool) -> Self {
        let store = Self::default();
        store.lock().tickets = tickets;
        store
    }

    pub fn tickets(&self) -> TicketPool {
        self.lock().tickets.clone()
    }

    pub fn presets(&self) -> PresetStore {
        self.lock().presets.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SnapshotSource for MemoryStore {
    fn subscribe(&self, collection: Collection, listener: SnapshotListener) -> SubscriptionId {
        let (id, revision, snapshot) = {
            let mut state = self.lock();
            let id = SubscriptionId(state.next_id);
            state.next_id += 1;
            state.listeners.push((id, collection, Arc::clone(&listener)));
            (id, Revision(state.revision), state.snapshot(collection))
        };
        listener(revision, snapshot);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().listeners.retain(|(listener_id, _, _)| *listener_id != id);
    }
}

impl TicketSink for MemoryStore {
    fn put_project_tickets(
        &self,
        project_id: &str,
        tickets: Vec<Value>,
    ) -> Result<(), StoreError> {
        let delivery = {
            let mut state = self.lock();
            let next = state.tickets.with_project(project_id, tickets);
            state.tickets = next;
            state.commit(Collection::Tickets)
        };
        delivery.send();
        Ok(())
    }
}

impl PresetSink for MemoryStore {
    fn put_presets(&self, presets: PresetStore) -> Result<(), StoreError> {
        let delivery = {
            let mut state = self.lock();
            state.presets = presets;
            state.commit(Collection::Presets)
        };
        delivery.send();
        Ok(())
    }
}

use std::collections::BTreeMap;
use std::sync::Arc;

use orgsync_core::Id;
use orgsync_core::entities::{Address, Coordinates, Organization};
use tokio::sync::watch;

/// A record addressable by its server-assigned id.
pub trait Keyed {
    fn id(&self) -> Id;
}

impl Keyed for Organization {
    fn id(&self) -> Id {
        self.id
    }
}

impl Keyed for Address {
    fn id(&self) -> Id {
        self.id
    }
}

impl Keyed for Coordinates {
    fn id(&self) -> Id {
        self.id
    }
}

/// Immutable view of a store at one point in time.
pub type Snapshot<T> = Arc<BTreeMap<Id, T>>;

/// Keyed in-memory collection of one entity type.
///
/// The current map sits behind a `watch` channel. Taking a snapshot clones an
/// `Arc`; a write copies the map only while an older snapshot is still alive,
/// so snapshots never change under their holder. Writes are visible to the next
/// [`snapshot`](Self::snapshot) call and wake every [`subscribe`](Self::subscribe)
/// receiver. Nothing here awaits.
#[derive(Debug)]
pub struct EntityStore<T> {
    tx: watch::Sender<Snapshot<T>>,
}

impl<T: Keyed + Clone> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed + Clone> EntityStore<T> {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(BTreeMap::new()));
        Self { tx }
    }

    /// Replace the whole collection. Returns the number of records kept.
    ///
    /// Records sharing an id collapse to the last one.
    pub fn replace_all<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let map: BTreeMap<Id, T> = records.into_iter().map(|r| (r.id(), r)).collect();
        let len = map.len();
        self.tx.send_replace(Arc::new(map));
        len
    }

    /// Insert or overwrite the record under its own id. Returns the previous
    /// record, if any.
    pub fn upsert(&self, record: T) -> Option<T> {
        let mut previous = None;
        self.tx.send_modify(|map| {
            previous = Arc::make_mut(map).insert(record.id(), record);
        });
        previous
    }

    /// Remove the record with `id`. Absent ids are a no-op and do not wake
    /// subscribers.
    pub fn remove(&self, id: Id) -> Option<T> {
        let mut removed = None;
        self.tx.send_if_modified(|map| {
            if !map.contains_key(&id) {
                return false;
            }
            removed = Arc::make_mut(map).remove(&id);
            true
        });
        removed
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<T> {
        Arc::clone(&self.tx.borrow())
    }

    #[must_use]
    pub fn get(&self, id: Id) -> Option<T> {
        self.tx.borrow().get(&id).cloned()
    }

    #[must_use]
    pub fn contains(&self, id: Id) -> bool {
        self.tx.borrow().contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    /// Receiver that is marked changed after every effective mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.tx.subscribe()
    }
}

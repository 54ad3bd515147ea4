//! Synchronous in-process watcher tables.
//!
//! One ordered listener list per (event kind, key filter) pair. Dispatch
//! snapshots the matching lists under the lock, releases it, then invokes
//! each listener under `catch_unwind`:
//!   - A listener cancelled *during* dispatch is still called in that
//!     round.
//!   - A listener added *during* dispatch is NOT called until the next
//!     reaction.
//!   - A panicking listener is logged and skipped; its siblings and the
//!     triggering operation are unaffected.

use crate::subscription::{KeyFilter, Listener, SubscriptionId};
use parking_lot::Mutex;
use rumble_core::{EventKind, Reaction};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use uuid::Uuid;

struct Entry {
    id: SubscriptionId,
    listener: Listener,
}

type FilterMap = HashMap<KeyFilter, Vec<Entry>>;

/// Ordered tables of synchronous listeners, split by event kind and key.
///
/// All methods take `&self`; the internal lock is never held while a
/// listener runs, so listeners may re-enter the table freely.
#[derive(Default)]
pub struct WatcherTable {
    inner: Mutex<HashMap<EventKind, FilterMap>>,
}

impl WatcherTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event` under `key` and return its id.
    ///
    /// Listeners are appended, so dispatch order within one filter is
    /// insertion order. The same closure subscribed twice is invoked twice.
    pub fn subscribe(&self, event: EventKind, key: KeyFilter, listener: Listener) -> SubscriptionId {
        let id = Uuid::new_v4();
        self.inner
            .lock()
            .entry(event)
            .or_default()
            .entry(key)
            .or_default()
            .push(Entry { id, listener });
        id
    }

    /// Remove the listener registered under `id`, if still present.
    ///
    /// Removal is by id, so cancelling one subscription never disturbs the
    /// position of another. Safe to call more than once.
    pub fn unsubscribe(&self, event: EventKind, key: &KeyFilter, id: SubscriptionId) {
        let mut tables = self.inner.lock();
        if let Some(filters) = tables.get_mut(&event) {
            if let Some(entries) = filters.get_mut(key) {
                entries.retain(|e| e.id != id);
                if entries.is_empty() {
                    filters.remove(key);
                }
            }
            if filters.is_empty() {
                tables.remove(&event);
            }
        }
    }

    /// Deliver `reaction` to every matching listener.
    ///
    /// Exact-key listeners run before wildcard listeners; within each
    /// group, insertion order. Both groups fire when both match - there is
    /// no deduplication across filters.
    pub fn dispatch(&self, reaction: &Reaction) {
        let snapshot: Vec<Listener> = {
            let tables = self.inner.lock();
            let Some(filters) = tables.get(&reaction.event) else {
                return;
            };
            let mut listeners = Vec::new();
            if let Some(key) = reaction.key.as_deref() {
                if let Some(entries) = filters.get(&KeyFilter::Exact(key.to_string())) {
                    listeners.extend(entries.iter().map(|e| Arc::clone(&e.listener)));
                }
            }
            if let Some(entries) = filters.get(&KeyFilter::Any) {
                listeners.extend(entries.iter().map(|e| Arc::clone(&e.listener)));
            }
            listeners
        };

        for listener in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(reaction))).is_err() {
                tracing::error!(
                    event = reaction.event.as_str(),
                    key = reaction.key.as_deref().unwrap_or(""),
                    "sync listener panicked during dispatch"
                );
            }
        }
    }

    /// Total number of registered listeners, across all kinds and filters.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .values()
            .flat_map(|filters| filters.values())
            .map(|entries| entries.len())
            .sum()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

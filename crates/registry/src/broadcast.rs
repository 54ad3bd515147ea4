//! Cross-context broadcast delivery.
//!
//! A [`BroadcastBus`] carries reactions between execution contexts that do
//! not share a call stack with the facade performing the operation - the
//! analogue of a globally scoped event target. Channels are plain strings;
//! the facade names them `storage.reactive.{instance_id}/{event}` so two
//! facades never collide, and listeners filter by key inside their wrapper.
//!
//! Handles are cheap clones over one shared table: publishing on any clone
//! reaches listeners registered through every other clone. Delivery is
//! still synchronous - the bus crosses contexts, not threads.

use crate::subscription::{Listener, SubscriptionId};
use parking_lot::Mutex;
use rumble_core::Reaction;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use uuid::Uuid;

struct Entry {
    id: SubscriptionId,
    listener: Listener,
}

/// Shared, named-channel broadcast table.
#[derive(Clone, Default)]
pub struct BroadcastBus {
    channels: Arc<Mutex<HashMap<String, Vec<Entry>>>>,
}

impl BroadcastBus {
    /// Create a bus with no channels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` on `channel` and return its id.
    pub fn subscribe(&self, channel: &str, listener: Listener) -> SubscriptionId {
        let id = Uuid::new_v4();
        self.channels
            .lock()
            .entry(channel.to_string())
            .or_default()
            .push(Entry { id, listener });
        id
    }

    /// Remove the listener registered under `id` on `channel`.
    ///
    /// Safe to call more than once; unknown ids are ignored.
    pub fn unsubscribe(&self, channel: &str, id: SubscriptionId) {
        let mut channels = self.channels.lock();
        if let Some(entries) = channels.get_mut(channel) {
            entries.retain(|e| e.id != id);
            if entries.is_empty() {
                channels.remove(channel);
            }
        }
    }

    /// Deliver `reaction` to every listener on `channel`, in insertion
    /// order.
    ///
    /// The listener list is snapshotted first and the lock released, so
    /// listeners may subscribe or unsubscribe re-entrantly. Panics are
    /// isolated per listener and logged.
    pub fn publish(&self, channel: &str, reaction: &Reaction) {
        let snapshot: Vec<Listener> = {
            let channels = self.channels.lock();
            match channels.get(channel) {
                Some(entries) => entries.iter().map(|e| Arc::clone(&e.listener)).collect(),
                None => return,
            }
        };

        tracing::debug!(channel, listeners = snapshot.len(), "broadcast publish");
        for listener in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(reaction))).is_err() {
                tracing::error!(channel, "broadcast listener panicked during dispatch");
            }
        }
    }

    /// Number of listeners currently registered on `channel`.
    pub fn channel_len(&self, channel: &str) -> usize {
        self.channels
            .lock()
            .get(channel)
            .map(|e| e.len())
            .unwrap_or(0)
    }
}

//! Storage context - the state shared by facades that opt into sharing.
//!
//! Each facade holds an `Arc<StorageContext>` bundling the cache, the
//! synchronous watcher table, and the broadcast bus. A fresh context is
//! created per facade by default, so independent facades over different
//! blocks never share state; passing one context to several facades (or
//! handing its bus to another execution context) is an explicit choice.

use crate::cache::Cache;
use rumble_registry::{BroadcastBus, WatcherTable};

/// Cache + notification registry bundle held by a facade.
///
/// `clear()` on the facade empties the cache but never the registry;
/// subscriptions outlive bulk clears.
#[derive(Default)]
pub struct StorageContext {
    /// Raw-string mirror of recently read/written values
    pub cache: Cache,
    /// Synchronous in-process listeners
    pub watchers: WatcherTable,
    /// Cross-context broadcast channels
    pub bus: BroadcastBus,
}

impl StorageContext {
    /// Create a context with an empty cache and no listeners.
    pub fn new() -> Self {
        Self::default()
    }
}

//! The storage block contract and an in-memory implementation.
//!
//! A block is the raw key/value store the facade wraps. It is assumed
//! local, synchronous and non-blocking; the only operation that can fail
//! is `set_item`, which may reject a write when capacity is exhausted.

use parking_lot::RwLock;
use rumble_core::{RumbleResult, StorageError};
use std::collections::BTreeMap;

/// External collaborator contract required of the underlying block.
///
/// Methods take `&self`; implementations use interior mutability so the
/// facade can stay `Send + Sync` without wrapping the block in its own
/// lock.
pub trait StorageBlock: Send + Sync {
    /// The current value for `key`, or `None` if the key does not exist.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Create or replace the value for `key`.
    ///
    /// May fail with [`StorageError::QuotaExceeded`] when the block cannot
    /// accept the write.
    fn set_item(&self, key: &str, value: &str) -> RumbleResult<()>;

    /// Remove `key`, if present.
    fn remove_item(&self, key: &str);

    /// Remove every key/value pair.
    fn clear(&self);

    /// Number of stored keys.
    fn len(&self) -> usize;

    /// Whether the block holds no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The nth key, or `None` when `index` is out of range.
    fn key(&self, index: usize) -> Option<String>;
}

/// In-memory block with lexicographic key order and an optional entry cap.
///
/// The default block for tests and ephemeral use. `key(index)` enumerates
/// keys in lexicographic order (the contract leaves the order
/// implementation-defined; this one is at least deterministic).
#[derive(Default)]
pub struct MemoryBlock {
    entries: RwLock<BTreeMap<String, String>>,
    max_entries: Option<usize>,
}

impl MemoryBlock {
    /// Create an unbounded block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a block that rejects writes of new keys beyond `max_entries`.
    ///
    /// Replacing an existing key always succeeds; only growth is capped.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            max_entries: Some(max_entries),
        }
    }
}

impl StorageBlock for MemoryBlock {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> RumbleResult<()> {
        let mut entries = self.entries.write();
        if let Some(max) = self.max_entries {
            if !entries.contains_key(key) && entries.len() >= max {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.entries.write().remove(key);
    }

    fn clear(&self) {
        self.entries.write().clear();
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn key(&self, index: usize) -> Option<String> {
        self.entries.read().keys().nth(index).cloned()
    }
}

//! Raw-string read/write-through cache.
//!
//! An in-memory mirror of recently read or written raw values, keyed by
//! storage key. The block stays authoritative: a miss falls back to the
//! block, and only non-null values are cached so a write performed behind
//! the facade's back is visible on the next read. Typed accessors
//! re-coerce on every call; the cache never holds coerced values.

use parking_lot::Mutex;
use std::collections::HashMap;

/// Raw-string cache over the block.
#[derive(Default)]
pub struct Cache {
    entries: Mutex<HashMap<String, String>>,
}

impl Cache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached raw value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    /// Record the raw value just read from or written to the block.
    pub fn insert(&self, key: &str, raw: &str) {
        self.entries.lock().insert(key.to_string(), raw.to_string());
    }

    /// Drop the entry for `key`, if present.
    pub fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get() {
        let cache = Cache::new();
        assert_eq!(cache.get("a"), None);

        cache.insert("a", "1");
        assert_eq!(cache.get("a"), Some("1".to_string()));
    }

    #[test]
    fn remove_and_clear_empty_entries() {
        let cache = Cache::new();
        cache.insert("a", "1");
        cache.insert("b", "2");

        cache.remove("a");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}

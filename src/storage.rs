//! The reactive storage facade.
//!
//! [`ReactiveStorage`] wraps a [`StorageBlock`] and layers three things on
//! top of it: a raw-string cache, typed value coercion, and reaction
//! dispatch to the notification registry. Every successful operation
//! produces exactly one [`Reaction`]; internal previous-value lookups and
//! bulk enumeration never dispatch.
//!
//! Facade handles are cheap clones: a clone shares the block, the context
//! and the instance id, which is what makes broadcast subscriptions taken
//! in one execution context observe writes performed through a clone held
//! elsewhere.

use crate::block::StorageBlock;
use crate::context::StorageContext;
use crate::pattern::Pattern;
use rumble_core::{cast, EventKind, Reaction, RumbleResult, StorageType, Value};
use rumble_registry::{KeyFilter, Subscription};
use std::sync::Arc;
use uuid::Uuid;

/// How a subscription receives reactions.
///
/// Both kinds share the [`Subscription`] capability; the caller picks one
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Invoke the listener directly in the call stack of the triggering
    /// operation, via the context's watcher table.
    Sync,
    /// Deliver over the instance's broadcast channel, reaching listeners
    /// registered through any clone of this facade.
    Broadcast,
}

/// One `{key, value}` row returned by [`ReactiveStorage::get_matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// The matching key
    pub key: String,
    /// Its raw value (`None` when the key vanished between enumeration
    /// and read)
    pub value: Option<String>,
}

/// Reactive facade over a storage block.
///
/// # Example
///
/// ```
/// use rumble::prelude::*;
///
/// let storage = ReactiveStorage::new(MemoryBlock::new());
/// let sub = storage.on_write("greeting", |r| {
///     println!("{:?} -> {:?}", r.previous, r.value);
/// });
///
/// storage.set_item("greeting", "hello")?;
/// assert_eq!(storage.get_item("greeting").as_deref(), Some("hello"));
///
/// sub.cancel();
/// # Ok::<(), rumble::StorageError>(())
/// ```
pub struct ReactiveStorage<B: StorageBlock> {
    id: Uuid,
    block: Arc<B>,
    context: Arc<StorageContext>,
}

impl<B: StorageBlock> Clone for ReactiveStorage<B> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            block: Arc::clone(&self.block),
            context: Arc::clone(&self.context),
        }
    }
}

impl<B: StorageBlock> ReactiveStorage<B> {
    /// Wrap `block` with a fresh, private [`StorageContext`].
    pub fn new(block: B) -> Self {
        Self::with_context(block, Arc::new(StorageContext::new()))
    }

    /// Wrap `block` reusing an existing context.
    ///
    /// Sharing a context (and therefore its cache, watcher table and bus)
    /// between facades is deliberate and explicit; `new` never shares.
    pub fn with_context(block: B, context: Arc<StorageContext>) -> Self {
        Self {
            id: Uuid::new_v4(),
            block: Arc::new(block),
            context,
        }
    }

    /// The runtime-assigned instance identifier used in broadcast channel
    /// names.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The context holding this facade's cache and registry.
    pub fn context(&self) -> &Arc<StorageContext> {
        &self.context
    }

    /// The broadcast channel name for `event` on this instance.
    fn channel(&self, event: EventKind) -> String {
        format!("storage.reactive.{}/{}", self.id, event)
    }

    fn dispatch(&self, reaction: Reaction) {
        tracing::debug!(
            event = reaction.event.as_str(),
            key = reaction.key.as_deref().unwrap_or(""),
            "dispatching reaction"
        );
        self.context.watchers.dispatch(&reaction);
        self.context
            .bus
            .publish(&self.channel(reaction.event), &reaction);
    }

    /// Raw read through the cache, without dispatching a reaction.
    ///
    /// Populates the cache on a hit against the block; misses are not
    /// cached, so a value written behind the facade's back shows up on
    /// the next read.
    fn peek(&self, key: &str) -> Option<String> {
        if let Some(raw) = self.context.cache.get(key) {
            return Some(raw);
        }
        let raw = self.block.get_item(key)?;
        self.context.cache.insert(key, &raw);
        Some(raw)
    }

    // -------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.block.len()
    }

    /// Whether the block holds no keys.
    pub fn is_empty(&self) -> bool {
        self.block.is_empty()
    }

    /// The nth key, or `None` when `index` is out of range.
    pub fn key(&self, index: usize) -> Option<String> {
        self.block.key(index)
    }

    /// The raw value for `key`, or `None` if the key does not exist.
    ///
    /// Fires a `get` reaction only when a value was found; a miss is
    /// silent.
    pub fn get_item(&self, key: &str) -> Option<String> {
        let raw = self.peek(key)?;
        self.dispatch(Reaction::get(key, Value::String(raw.clone())));
        Some(raw)
    }

    /// Alias for [`get_item`](Self::get_item) - the string-typed read.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_item(key)
    }

    /// The value for `key` coerced to a number per the [`cast`] rules
    /// (longest numeric prefix), or `None` when absent or unparsable.
    ///
    /// Fires a `get` reaction only when the coercion produced a number.
    pub fn get_number(&self, key: &str) -> Option<f64> {
        let raw = self.peek(key);
        let n = cast(raw.as_deref(), StorageType::Number)?.as_number()?;
        self.dispatch(Reaction::get(key, Value::Number(n)));
        Some(n)
    }

    /// The value for `key` coerced to a boolean; an absent or
    /// unrecognized value degrades to `false`.
    ///
    /// Fires a `get` reaction only when the key held a value.
    pub fn get_boolean(&self, key: &str) -> bool {
        let raw = self.peek(key);
        let found = raw.is_some();
        let b = cast(raw.as_deref(), StorageType::Boolean)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if found {
            self.dispatch(Reaction::get(key, Value::Bool(b)));
        }
        b
    }

    /// The value for `key` parsed as JSON, or `None` when absent or
    /// malformed (parse failures are swallowed).
    ///
    /// Fires a `get` reaction only when the parse succeeded.
    pub fn get_object(&self, key: &str) -> Option<serde_json::Value> {
        let raw = self.peek(key);
        let obj = match cast(raw.as_deref(), StorageType::Object)? {
            Value::Object(o) => o,
            _ => return None,
        };
        self.dispatch(Reaction::get(key, Value::Object(obj.clone())));
        Some(obj)
    }

    /// Ordered `{key, value}` rows for every key matching `pattern`.
    ///
    /// Enumeration reads through the cache but fires no reactions.
    pub fn get_matches(&self, pattern: impl Into<Pattern>) -> Vec<Match> {
        let pattern = pattern.into();
        let mut matches = Vec::new();
        for index in 0..self.len() {
            let Some(key) = self.key(index) else { continue };
            if pattern.matches(&key) {
                let value = self.peek(&key);
                matches.push(Match { key, value });
            }
        }
        matches
    }

    /// Like [`get_matches`](Self::get_matches), excluding null values.
    pub fn get_non_null_matches(&self, pattern: impl Into<Pattern>) -> Vec<(String, String)> {
        self.get_matches(pattern)
            .into_iter()
            .filter_map(|m| m.value.map(|v| (m.key, v)))
            .collect()
    }

    // -------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------

    /// Write-through: block first, then cache, then one `set` reaction.
    ///
    /// `raw` is the textual form stored in the block; `logical` is the
    /// typed value carried by the reaction. A failed block write leaves
    /// the cache untouched and fires nothing.
    fn set_raw(&self, key: &str, raw: &str, logical: Value) -> RumbleResult<()> {
        let previous = self.peek(key).map(Value::String);
        self.block.set_item(key, raw)?;
        self.context.cache.insert(key, raw);
        tracing::debug!(key, value_type = logical.type_name(), "set");
        self.dispatch(Reaction::set(key, logical, previous));
        Ok(())
    }

    /// Set the raw value for `key`, creating the pair if absent.
    ///
    /// Capacity failures from the block propagate unmodified; no reaction
    /// fires in that case.
    pub fn set_item(&self, key: &str, value: &str) -> RumbleResult<()> {
        self.set_raw(key, value, Value::String(value.to_string()))
    }

    /// Alias for [`set_item`](Self::set_item) - the string-typed write.
    pub fn set_string(&self, key: &str, value: &str) -> RumbleResult<()> {
        self.set_item(key, value)
    }

    /// Store a number under `key` (serialized via its shortest decimal
    /// form).
    pub fn set_number(&self, key: &str, value: f64) -> RumbleResult<()> {
        let logical = Value::Number(value);
        let raw = logical.to_storage_string()?;
        self.set_raw(key, &raw, logical)
    }

    /// Store a boolean under `key` as `"true"` / `"false"`.
    pub fn set_boolean(&self, key: &str, value: bool) -> RumbleResult<()> {
        let logical = Value::Bool(value);
        let raw = logical.to_storage_string()?;
        self.set_raw(key, &raw, logical)
    }

    /// Store a JSON value under `key` as compact JSON text.
    pub fn set_object(&self, key: &str, value: serde_json::Value) -> RumbleResult<()> {
        let logical = Value::Object(value);
        let raw = logical.to_storage_string()?;
        self.set_raw(key, &raw, logical)
    }

    /// Store `value` under `key` via the setter matching its type.
    pub fn set_value(&self, key: &str, value: Value) -> RumbleResult<()> {
        match value {
            Value::String(s) => self.set_item(key, &s),
            Value::Number(n) => self.set_number(key, n),
            Value::Bool(b) => self.set_boolean(key, b),
            Value::Object(o) => self.set_object(key, o),
        }
    }

    /// Write `value` only if the block currently reports no value for
    /// `key`.
    ///
    /// The check goes straight to the block, bypassing the cache, so a
    /// stale cache entry can never suppress or force the write. Returns
    /// whether a write happened; when it does not, no reaction fires.
    pub fn set_default(&self, key: &str, value: impl Into<Value>) -> RumbleResult<bool> {
        if self.block.get_item(key).is_some() {
            return Ok(false);
        }
        self.set_value(key, value.into())?;
        Ok(true)
    }

    /// Remove the pair for `key`, if present.
    ///
    /// Always fires a `remove` reaction; when the key was already absent
    /// the reaction's `value` is `None`.
    pub fn remove_item(&self, key: &str) {
        let value = self.peek(key).map(Value::String);
        self.block.remove_item(key);
        self.context.cache.remove(key);
        tracing::debug!(key, "remove");
        self.dispatch(Reaction::remove(key, value));
    }

    /// Remove every pair and empty the cache.
    ///
    /// Fires one `clear` reaction total, not one per key. Subscriptions
    /// survive: the registry is not reset.
    pub fn clear(&self) {
        self.block.clear();
        self.context.cache.clear();
        tracing::debug!("clear");
        self.dispatch(Reaction::clear());
    }

    // -------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------

    /// Register `listener` for `event` under `key`, with the delivery
    /// mode chosen explicitly.
    ///
    /// `key` accepts a literal key, `"*"` for the wildcard, or a
    /// [`KeyFilter`] directly. The returned [`Subscription`] must be
    /// cancelled to release the registry slot.
    pub fn on(
        &self,
        event: EventKind,
        key: impl Into<KeyFilter>,
        delivery: Delivery,
        listener: impl Fn(&Reaction) + Send + Sync + 'static,
    ) -> Subscription {
        let filter = key.into();
        match delivery {
            Delivery::Sync => {
                let id = self
                    .context
                    .watchers
                    .subscribe(event, filter.clone(), Arc::new(listener));
                let context = Arc::clone(&self.context);
                let cancel_filter = filter.clone();
                Subscription::new(
                    id,
                    event,
                    filter,
                    Box::new(move || context.watchers.unsubscribe(event, &cancel_filter, id)),
                )
            }
            Delivery::Broadcast => {
                let channel = self.channel(event);
                // The channel already narrows by instance and event kind;
                // the wrapper narrows by key.
                let wrapper_filter = filter.clone();
                let wrapped = Arc::new(move |reaction: &Reaction| {
                    if wrapper_filter.matches(reaction.key.as_deref()) {
                        listener(reaction);
                    }
                });
                let id = self.context.bus.subscribe(&channel, wrapped);
                let bus = self.context.bus.clone();
                let cancel_channel = channel.clone();
                Subscription::new(
                    id,
                    event,
                    filter,
                    Box::new(move || bus.unsubscribe(&cancel_channel, id)),
                )
            }
        }
    }

    /// Subscribe to `get` reactions for `key` (broadcast delivery).
    pub fn on_read(
        &self,
        key: impl Into<KeyFilter>,
        listener: impl Fn(&Reaction) + Send + Sync + 'static,
    ) -> Subscription {
        self.on(EventKind::Get, key, Delivery::Broadcast, listener)
    }

    /// Subscribe to `set` reactions for `key` (broadcast delivery).
    pub fn on_write(
        &self,
        key: impl Into<KeyFilter>,
        listener: impl Fn(&Reaction) + Send + Sync + 'static,
    ) -> Subscription {
        self.on(EventKind::Set, key, Delivery::Broadcast, listener)
    }

    /// Subscribe to `remove` reactions for `key` (broadcast delivery).
    pub fn on_remove(
        &self,
        key: impl Into<KeyFilter>,
        listener: impl Fn(&Reaction) + Send + Sync + 'static,
    ) -> Subscription {
        self.on(EventKind::Remove, key, Delivery::Broadcast, listener)
    }

    /// Subscribe to the single reaction fired by [`clear`](Self::clear)
    /// (broadcast delivery).
    pub fn on_clear(
        &self,
        listener: impl Fn(&Reaction) + Send + Sync + 'static,
    ) -> Subscription {
        self.on(EventKind::Clear, KeyFilter::Any, Delivery::Broadcast, listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::MemoryBlock;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn storage() -> ReactiveStorage<MemoryBlock> {
        ReactiveStorage::new(MemoryBlock::new())
    }

    #[test]
    fn peek_populates_cache_and_falls_back_to_block() {
        let s = storage();
        s.block.set_item("k", "behind-the-back").unwrap();

        // First read misses the cache and hits the block.
        assert_eq!(s.get_item("k").as_deref(), Some("behind-the-back"));
        assert_eq!(s.context.cache.get("k").as_deref(), Some("behind-the-back"));
    }

    #[test]
    fn write_updates_cache_unconditionally() {
        let s = storage();
        s.set_item("k", "v1").unwrap();
        assert_eq!(s.context.cache.get("k").as_deref(), Some("v1"));

        s.set_item("k", "v2").unwrap();
        assert_eq!(s.context.cache.get("k").as_deref(), Some("v2"));
    }

    #[test]
    fn failed_write_leaves_cache_untouched_and_fires_nothing() {
        let s = ReactiveStorage::new(MemoryBlock::with_capacity(1));
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let _sub = s.on(EventKind::Set, "*", Delivery::Sync, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        s.set_item("a", "1").unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let err = s.set_item("b", "2").unwrap_err();
        assert!(matches!(
            err,
            rumble_core::StorageError::QuotaExceeded { .. }
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(s.context.cache.get("b"), None);
    }

    #[test]
    fn typed_reads_recoerce_every_call() {
        let s = storage();
        s.set_number("age", 5.0).unwrap();

        // Cache holds the raw string; both views agree with it.
        assert_eq!(s.get_number("age"), Some(5.0));
        assert_eq!(s.get_string("age").as_deref(), Some("5"));
        assert_eq!(s.get_number("age"), Some(5.0));
    }

    #[test]
    fn set_reaction_previous_is_raw_string() {
        let s = storage();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = Arc::clone(&seen);
        let _sub = s.on(EventKind::Set, "n", Delivery::Sync, move |r| {
            seen2.lock().push(r.clone());
        });

        s.set_number("n", 1.5).unwrap();
        s.set_number("n", 2.5).unwrap();

        let reactions = seen.lock();
        assert_eq!(reactions[0].previous, None);
        assert_eq!(reactions[0].value, Some(Value::Number(1.5)));
        assert_eq!(reactions[1].previous, Some(Value::String("1.5".to_string())));
        assert_eq!(reactions[1].value, Some(Value::Number(2.5)));
    }

    #[test]
    fn get_miss_is_silent() {
        let s = storage();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let _sub = s.on(EventKind::Get, "*", Delivery::Sync, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(s.get_item("missing"), None);
        assert_eq!(s.get_number("missing"), None);
        assert!(!s.get_boolean("missing"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        s.set_item("present", "1").unwrap();
        let _ = s.get_item("present");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn matches_fire_no_reactions() {
        let s = storage();
        s.set_item("user:1", "a").unwrap();
        s.set_item("user:2", "b").unwrap();
        s.set_item("session", "c").unwrap();

        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let _sub = s.on(EventKind::Get, "*", Delivery::Sync, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        let matches = s.get_matches("user");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].key, "user:1");
        assert_eq!(matches[0].value.as_deref(), Some("a"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn set_default_dispatches_on_value_type() {
        let s = storage();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = Arc::clone(&seen);
        let _sub = s.on(EventKind::Set, "*", Delivery::Sync, move |r| {
            seen2.lock().push(r.value.clone());
        });

        assert!(s.set_default("n", 4.5).unwrap());
        assert!(s.set_default("b", true).unwrap());
        assert!(!s.set_default("n", 99.0).unwrap());

        let values = seen.lock();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], Some(Value::Number(4.5)));
        assert_eq!(values[1], Some(Value::Bool(true)));
    }

    #[test]
    fn set_default_bypasses_stale_cache() {
        let s = storage();
        s.set_item("k", "v").unwrap();
        // Remove behind the facade's back: the cache still says present.
        s.block.remove_item("k");
        assert_eq!(s.context.cache.get("k").as_deref(), Some("v"));

        // The block is authoritative, so the default is written.
        assert!(s.set_default("k", "fresh").unwrap());
        assert_eq!(s.block.get_item("k").as_deref(), Some("fresh"));
    }

    #[test]
    fn clones_share_state_and_id() {
        let a = storage();
        let b = a.clone();

        a.set_item("k", "v").unwrap();
        assert_eq!(b.get_item("k").as_deref(), Some("v"));
        assert_eq!(a.id(), b.id());
    }
}

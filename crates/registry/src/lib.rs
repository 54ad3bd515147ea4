//! Notification registry for the rumble reactive storage facade.
//!
//! Two independent delivery mechanisms share the [`Subscription`] handle:
//!
//! - [`WatcherTable`] - synchronous in-process delivery: listeners keyed by
//!   event kind and key (or wildcard) are invoked directly, in insertion
//!   order, within the same call stack as the triggering operation.
//! - [`BroadcastBus`] - cross-context delivery: reactions are published on
//!   uniquely named channels; listeners registered against the same channel
//!   from any context sharing the bus observe them, filtered by key inside
//!   the listener wrapper.
//!
//! ## Dispatch discipline
//!
//! Listener lists are snapshotted before invocation and locks released, so
//! re-entrant listeners can subscribe, cancel, or write without
//! deadlocking - and a cancellation during dispatch does not affect the
//! snapshot already taken. Listener panics are caught per listener and
//! logged; one misbehaving subscriber never aborts its siblings or the
//! triggering operation.

pub mod broadcast;
pub mod subscription;
pub mod watchers;

pub use broadcast::BroadcastBus;
pub use subscription::{KeyFilter, Listener, Subscription, SubscriptionId};
pub use watchers::WatcherTable;

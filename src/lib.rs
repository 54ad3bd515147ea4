//! # Rumble
//!
//! Reactive facade over a synchronous key/value storage block.
//!
//! Rumble wraps any [`StorageBlock`] with typed reads and writes, a
//! raw-string cache, and change notifications: listeners subscribe by
//! event kind and key (or wildcard) and are delivered [`Reaction`] records
//! either synchronously in the triggering call stack or over a
//! cross-context broadcast channel.
//!
//! ## Quick Start
//!
//! ```
//! use rumble::prelude::*;
//!
//! let storage = ReactiveStorage::new(MemoryBlock::new());
//!
//! // Typed writes and reads over one textual store
//! storage.set_number("age", 5.0)?;
//! assert_eq!(storage.get_number("age"), Some(5.0));
//!
//! // Write only when absent - the first value wins
//! storage.set_default("age", 99.0)?;
//! assert_eq!(storage.get_number("age"), Some(5.0));
//!
//! // React to writes on any key
//! let sub = storage.on(EventKind::Set, "*", Delivery::Sync, |reaction| {
//!     println!("{:?} changed to {:?}", reaction.key, reaction.value);
//! });
//! storage.set_item("name", "alice")?;
//! sub.cancel();
//! # Ok::<(), rumble::StorageError>(())
//! ```
//!
//! ## Delivery modes
//!
//! - [`Delivery::Sync`] - the listener runs inside the call stack of the
//!   operation that triggered it, before the operation returns.
//! - [`Delivery::Broadcast`] - the reaction travels over a channel named
//!   after the facade instance; clones of the facade held in other
//!   execution contexts observe it through their shared bus.
//!
//! A panicking listener is isolated and logged in both modes; it never
//! aborts sibling listeners or the operation that fired.

#![warn(missing_docs)]

mod block;
mod cache;
mod context;
mod pattern;
mod storage;

pub mod prelude;

// Re-export the facade surface
pub use block::{MemoryBlock, StorageBlock};
pub use cache::Cache;
pub use context::StorageContext;
pub use pattern::Pattern;
pub use storage::{Delivery, Match, ReactiveStorage};

// Re-export core types
pub use rumble_core::{cast, EventKind, Reaction, RumbleResult, StorageError, StorageType, Value};

// Re-export subscription types
pub use rumble_registry::{BroadcastBus, KeyFilter, Subscription, SubscriptionId, WatcherTable};

//! Convenient imports for rumble.
//!
//! This module re-exports the most commonly used types so you can get
//! started with a single import:
//!
//! ```
//! use rumble::prelude::*;
//!
//! let storage = ReactiveStorage::new(MemoryBlock::new());
//! storage.set_item("key", "value")?;
//! # Ok::<(), StorageError>(())
//! ```

// Facade
pub use crate::storage::{Delivery, Match, ReactiveStorage};

// Blocks and context
pub use crate::block::{MemoryBlock, StorageBlock};
pub use crate::context::StorageContext;
pub use crate::pattern::Pattern;

// Core types
pub use rumble_core::{cast, EventKind, Reaction, RumbleResult, StorageError, StorageType, Value};

// Subscriptions
pub use rumble_registry::{KeyFilter, Subscription};

// Re-export serde_json for convenience
pub use serde_json::json;

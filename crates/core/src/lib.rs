//! Core types for the rumble reactive storage facade.
//!
//! This crate defines the canonical value model, the string-to-typed
//! coercion layer, the `Reaction` event record, and the error types shared
//! by the registry and facade crates. It performs no I/O and holds no
//! state.

pub mod cast;
pub mod error;
pub mod reaction;
pub mod value;

pub use cast::cast;
pub use error::{RumbleResult, StorageError};
pub use reaction::{EventKind, Reaction};
pub use value::{StorageType, Value};

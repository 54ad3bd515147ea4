//! Error types for rumble.
//!
//! Only block writes can fail from a caller's point of view: coercion
//! failures always degrade to a sentinel value (`false`, `None`) and are
//! never surfaced. Capacity failures from the block propagate unmodified;
//! the triggering operation fires no reaction in that case.

use thiserror::Error;

/// All rumble errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The block rejected a write because its capacity is exhausted
    #[error("quota exceeded while writing key '{key}'")]
    QuotaExceeded {
        /// The key whose write was rejected
        key: String,
    },

    /// Any other failure reported by the underlying block
    #[error("block error: {message}")]
    Block {
        /// Error message from the block
        message: String,
    },

    /// A value could not be serialized to its textual storage form
    #[error("serialization error: {message}")]
    Serialization {
        /// Error message from the serializer
        message: String,
    },
}

/// Result type for all rumble operations
pub type RumbleResult<T> = Result<T, StorageError>;

//! Reaction - the event record describing one storage operation's outcome.
//!
//! Every successful facade operation produces exactly one `Reaction` and
//! offers it to the notification registry. Reactions are immutable once
//! constructed and exist only transiently, passed by reference to
//! listeners.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of storage operation a reaction describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A read that found a value
    Get,
    /// A write (create or replace)
    Set,
    /// A single-key removal
    Remove,
    /// A bulk removal of every key
    Clear,
}

impl EventKind {
    /// Returns the event name as a string (used in broadcast channel names)
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Get => "get",
            EventKind::Set => "set",
            EventKind::Remove => "remove",
            EventKind::Clear => "clear",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" => Ok(EventKind::Get),
            "set" => Ok(EventKind::Set),
            "remove" => Ok(EventKind::Remove),
            "clear" => Ok(EventKind::Clear),
            other => Err(format!("unknown event kind: {}", other)),
        }
    }
}

/// The event record delivered to listeners.
///
/// | Event    | `key`  | `value`                  | `previous`          |
/// |----------|--------|--------------------------|---------------------|
/// | `Get`    | `Some` | the value that was read  | `None`              |
/// | `Set`    | `Some` | the just-written value   | pre-write raw value |
/// | `Remove` | `Some` | the value just removed   | `None`              |
/// | `Clear`  | `None` | `None`                   | `None`              |
///
/// `previous` is always the raw textual value the block held before the
/// write (wrapped as [`Value::String`]); it is never re-coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Which operation produced this reaction
    pub event: EventKind,
    /// The affected key; `None` only for `Clear`
    pub key: Option<String>,
    /// Post-operation value (or the removed value for `Remove`)
    pub value: Option<Value>,
    /// Pre-operation value, populated for `Set`
    pub previous: Option<Value>,
}

impl Reaction {
    /// A reaction for a read that found `value` under `key`.
    pub fn get(key: impl Into<String>, value: Value) -> Self {
        Self {
            event: EventKind::Get,
            key: Some(key.into()),
            value: Some(value),
            previous: None,
        }
    }

    /// A reaction for a write of `value` under `key`, where the block
    /// previously held `previous` (raw, `None` when the key was absent).
    pub fn set(key: impl Into<String>, value: Value, previous: Option<Value>) -> Self {
        Self {
            event: EventKind::Set,
            key: Some(key.into()),
            value: Some(value),
            previous,
        }
    }

    /// A reaction for the removal of `key`, which held `value` just before
    /// (`None` when the key was already absent - the reaction still fires).
    pub fn remove(key: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            event: EventKind::Remove,
            key: Some(key.into()),
            value,
            previous: None,
        }
    }

    /// The single reaction fired by a bulk clear.
    pub fn clear() -> Self {
        Self {
            event: EventKind::Clear,
            key: None,
            value: None,
            previous: None,
        }
    }
}

//! Value types for rumble
//!
//! This module defines the canonical `Value` type carried by reactions and
//! accepted by the typed setters, plus the `StorageType` tag used to select
//! a coercion target.
//!
//! The underlying block only ever stores strings; `Value` is the logical
//! view layered on top of it. `to_storage_string` defines the one canonical
//! textual form per type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four logical types a stored string can be read as.
///
/// This enum identifies which coercion a typed accessor applies.
/// Used for type discrimination and dispatch; there is no implicit
/// cross-type coercion beyond what [`crate::cast`] defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// UTF-8 text, stored as-is
    String,
    /// 64-bit IEEE-754 floating point
    Number,
    /// Boolean true or false
    Boolean,
    /// Structured JSON value
    Object,
}

impl StorageType {
    /// Returns the type name as a string (for logs and error messages)
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::String => "string",
            StorageType::Number => "number",
            StorageType::Boolean => "boolean",
            StorageType::Object => "object",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(StorageType::String),
            "number" => Ok(StorageType::Number),
            "boolean" => Ok(StorageType::Boolean),
            "object" => Ok(StorageType::Object),
            other => Err(format!("unknown storage type: {}", other)),
        }
    }
}

/// A logical value read from or written to the storage block.
///
/// ## The Four Types
///
/// 1. `String` - UTF-8 text
/// 2. `Number` - 64-bit IEEE-754 floating point
/// 3. `Bool` - Boolean true or false
/// 4. `Object` - structured JSON value
///
/// Equality follows the wrapped types; `Number` uses IEEE-754 equality,
/// so `NaN != NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// UTF-8 text
    String(String),
    /// 64-bit floating point
    Number(f64),
    /// Boolean true or false
    Bool(bool),
    /// Structured JSON value
    Object(serde_json::Value),
}

impl Value {
    /// The [`StorageType`] tag for this value
    pub fn storage_type(&self) -> StorageType {
        match self {
            Value::String(_) => StorageType::String,
            Value::Number(_) => StorageType::Number,
            Value::Bool(_) => StorageType::Boolean,
            Value::Object(_) => StorageType::Object,
        }
    }

    /// Returns the type name as a string (for error messages)
    pub fn type_name(&self) -> &'static str {
        self.storage_type().as_str()
    }

    /// Try to get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as f64
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as JSON object reference
    pub fn as_object(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Serialize to the canonical textual form stored in the block.
    ///
    /// Numbers use the shortest round-trip decimal form (`5.0` stores as
    /// `"5"`), booleans store as `"true"`/`"false"`, objects as compact
    /// JSON.
    pub fn to_storage_string(&self) -> Result<String, crate::error::StorageError> {
        match self {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Object(o) => serde_json::to_string(o).map_err(|e| {
                crate::error::StorageError::Serialization {
                    message: e.to_string(),
                }
            }),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Object(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_storage_string() {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("<unserializable>"),
        }
    }
}

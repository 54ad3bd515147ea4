//! Coercion from raw stored text to typed values.
//!
//! The underlying block may have been written by another process or an
//! older version expecting a different type, so coercion never fails from
//! the caller's point of view: every failure degrades to a documented
//! sentinel (`false` for booleans, `None` for numbers and objects).

use crate::value::{StorageType, Value};

/// Convert a raw stored value (or absence) into a typed logical value.
///
/// | Target    | absent / empty       | on parse failure |
/// |-----------|----------------------|------------------|
/// | `String`  | `None`               | n/a (identity)   |
/// | `Boolean` | `Some(Bool(false))`  | `Bool(false)`    |
/// | `Number`  | `None`               | `None`           |
/// | `Object`  | `None`               | `None`           |
///
/// Booleans compare case-insensitively against `"true"` and `"1"`.
/// Numbers parse a float from the longest valid prefix of the text,
/// skipping leading whitespace, so `"12.5abc"` casts to `12.5`.
pub fn cast(raw: Option<&str>, ty: StorageType) -> Option<Value> {
    match ty {
        StorageType::String => raw.map(|s| Value::String(s.to_string())),
        StorageType::Boolean => {
            let parsed = match raw {
                None | Some("") => false,
                Some(s) => {
                    let lower = s.to_lowercase();
                    lower == "true" || lower == "1"
                }
            };
            Some(Value::Bool(parsed))
        }
        StorageType::Object => match raw {
            None | Some("") => None,
            Some(s) => serde_json::from_str(s).ok().map(Value::Object),
        },
        StorageType::Number => match raw {
            None | Some("") => None,
            Some(s) => parse_number_prefix(s).map(Value::Number),
        },
    }
}

/// Parse a float from the longest valid numeric prefix of `text`.
///
/// Leading whitespace is skipped and trailing garbage ignored. Accepts an
/// optional sign, a decimal mantissa, an optional exponent, and the
/// literal `Infinity`. Returns `None` when no numeric prefix exists.
fn parse_number_prefix(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut pos = 0;

    if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
        pos += 1;
    }

    if trimmed[pos..].starts_with("Infinity") {
        let inf = if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return Some(inf);
    }

    let mantissa_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = pos - mantissa_start;
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    // At least one digit is required in the mantissa.
    let mantissa_len = pos - mantissa_start;
    let has_digits = int_digits > 0 || mantissa_len > int_digits + 1;
    if !has_digits {
        return None;
    }

    // Optional exponent: e/E, optional sign, at least one digit.
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut exp_pos = pos + 1;
        if exp_pos < bytes.len() && (bytes[exp_pos] == b'+' || bytes[exp_pos] == b'-') {
            exp_pos += 1;
        }
        let exp_digits_start = exp_pos;
        while exp_pos < bytes.len() && bytes[exp_pos].is_ascii_digit() {
            exp_pos += 1;
        }
        if exp_pos > exp_digits_start {
            pos = exp_pos;
        }
    }

    trimmed[..pos].parse::<f64>().ok()
}

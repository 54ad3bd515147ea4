//! Key patterns for bulk lookups.

use regex::Regex;

/// A pattern matched against stored keys by [`get_matches`] and
/// [`get_non_null_matches`].
///
/// Plain strings match as substrings; compiled [`Regex`] values match as
/// regular expressions.
///
/// [`get_matches`]: crate::ReactiveStorage::get_matches
/// [`get_non_null_matches`]: crate::ReactiveStorage::get_non_null_matches
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Match keys containing this substring
    Substring(String),
    /// Match keys the regex finds a match in
    Regex(Regex),
}

impl Pattern {
    /// Whether `key` matches this pattern.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Pattern::Substring(s) => key.contains(s.as_str()),
            Pattern::Regex(re) => re.is_match(key),
        }
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Pattern::Substring(s.to_string())
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Pattern::Substring(s)
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Pattern::Regex(re)
    }
}

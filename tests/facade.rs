//! Integration tests for the facade's read/write surface.

use rumble::prelude::*;

fn storage() -> ReactiveStorage<MemoryBlock> {
    ReactiveStorage::new(MemoryBlock::new())
}

#[test]
fn set_then_get_round_trips() {
    let s = storage();
    s.set_item("k", "v").unwrap();
    assert_eq!(s.get_item("k").as_deref(), Some("v"));
    assert_eq!(s.get_string("k").as_deref(), Some("v"));
}

#[test]
fn clear_empties_everything() {
    let s = storage();
    s.set_item("a", "1").unwrap();
    s.set_item("b", "2").unwrap();

    s.clear();
    assert_eq!(s.len(), 0);
    assert!(s.is_empty());
    assert_eq!(s.get_item("a"), None);
    assert_eq!(s.get_item("b"), None);
}

#[test]
fn len_and_key_enumerate_the_block() {
    let s = storage();
    s.set_item("b", "2").unwrap();
    s.set_item("a", "1").unwrap();

    assert_eq!(s.len(), 2);
    assert_eq!(s.key(0).as_deref(), Some("a"));
    assert_eq!(s.key(1).as_deref(), Some("b"));
    assert_eq!(s.key(2), None);
}

#[test]
fn typed_round_trips() {
    let s = storage();

    s.set_number("age", 5.0).unwrap();
    assert_eq!(s.get_number("age"), Some(5.0));

    s.set_boolean("flag", true).unwrap();
    assert!(s.get_boolean("flag"));

    s.set_object("profile", json!({"name": "alice"})).unwrap();
    assert_eq!(s.get_object("profile"), Some(json!({"name": "alice"})));
}

#[test]
fn number_parses_longest_prefix() {
    let s = storage();
    s.set_item("x", "12.5abc").unwrap();
    assert_eq!(s.get_number("x"), Some(12.5));
}

#[test]
fn boolean_coercion_degrades_to_false() {
    let s = storage();
    s.set_item("a", "TRUE").unwrap();
    s.set_item("b", "1").unwrap();
    s.set_item("c", "no").unwrap();

    assert!(s.get_boolean("a"));
    assert!(s.get_boolean("b"));
    assert!(!s.get_boolean("c"));
    assert!(!s.get_boolean("absent"));
}

#[test]
fn malformed_object_reads_as_none() {
    let s = storage();
    s.set_item("o", "{not json").unwrap();
    assert_eq!(s.get_object("o"), None);
    // The raw string is still there.
    assert_eq!(s.get_item("o").as_deref(), Some("{not json"));
}

#[test]
fn set_default_first_value_wins() {
    let s = storage();

    assert!(s.set_default("k", "first").unwrap());
    assert!(!s.set_default("k", "second").unwrap());
    assert_eq!(s.get_item("k").as_deref(), Some("first"));
}

#[test]
fn set_default_number_scenario() {
    let s = storage();
    s.set_number("age", 5.0).unwrap();
    s.set_default("age", 99.0).unwrap();
    assert_eq!(s.get_number("age"), Some(5.0));
}

#[test]
fn matches_by_substring_and_regex() {
    let s = storage();
    s.set_item("user:1", "alice").unwrap();
    s.set_item("user:2", "bob").unwrap();
    s.set_item("session:1", "xyz").unwrap();

    let by_substring = s.get_matches("user");
    assert_eq!(by_substring.len(), 2);
    assert_eq!(by_substring[0].key, "user:1");
    assert_eq!(by_substring[0].value.as_deref(), Some("alice"));

    let re = regex::Regex::new(r"^user:\d+$").unwrap();
    let by_regex = s.get_non_null_matches(re);
    assert_eq!(
        by_regex,
        vec![
            ("user:1".to_string(), "alice".to_string()),
            ("user:2".to_string(), "bob".to_string()),
        ]
    );
}

#[test]
fn quota_failure_propagates_unmodified() {
    let s = ReactiveStorage::new(MemoryBlock::with_capacity(1));
    s.set_item("a", "1").unwrap();

    let err = s.set_item("b", "2").unwrap_err();
    assert_eq!(
        err,
        StorageError::QuotaExceeded {
            key: "b".to_string()
        }
    );
    // The failed write left nothing behind.
    assert_eq!(s.get_item("b"), None);
    assert_eq!(s.len(), 1);
}

#[test]
fn independent_facades_share_nothing_by_default() {
    let a = storage();
    let b = storage();

    a.set_item("k", "from-a").unwrap();
    assert_eq!(b.get_item("k"), None);
}

#[test]
fn facades_can_share_a_context_deliberately() {
    use std::sync::Arc;

    let context = Arc::new(StorageContext::new());
    let a = ReactiveStorage::with_context(MemoryBlock::new(), Arc::clone(&context));
    let _b = ReactiveStorage::with_context(MemoryBlock::new(), Arc::clone(&context));

    a.set_item("k", "v").unwrap();
    // The shared cache mirrors a's write.
    assert_eq!(context.cache.get("k").as_deref(), Some("v"));
}

//! Purpose: Lock the access and ownership contract of `Value` handles.
//! Exports: Integration tests only.
//! Role: Exercise the public mutation surface the way callers use it.
//! Invariants: Mismatched reads return zero values and mismatched writes change nothing.
//! Invariants: Handle copies share one store; dropping a copy never disturbs the original.

use rcjson::{Kind, Value};

#[test]
fn object_insert_read_and_remove() {
    let object = Value::new_object();
    object.set_key("a", "Hello, world!");
    object.set_key("b", 42);

    assert_eq!(
        object.get_key("a").map(|v| v.get::<String>()),
        Some("Hello, world!".to_string())
    );
    assert_eq!(object.get_key("b").map(|v| v.get::<i32>()), Some(42));

    assert!(object.remove_key("a"));
    assert!(object.get_key("a").is_none());
    assert!(!object.remove_key("a"));
    assert_eq!(object.len(), 1);
}

#[test]
fn object_lookup_does_not_create_entries() {
    let object = Value::new_object();
    assert!(object.get_key("missing").is_none());
    assert!(object.is_empty());
    assert!(!object.contains_key("missing"));
}

#[test]
fn array_append_read_and_remove() {
    let array = Value::new_array();
    assert!(array.push(42));
    assert_eq!(array.get_index(0).map(|v| v.get::<i32>()), Some(42));

    assert!(array.remove_index(0));
    assert!(array.is_empty());
    assert!(array.get_index(0).is_none());
}

#[test]
fn array_out_of_range_writes_are_no_ops() {
    let array = Value::new_array();
    array.push(1);
    array.push(2);

    assert!(!array.set_index(2, 99));
    assert!(!array.remove_index(5));
    assert_eq!(array.len(), 2);
    assert_eq!(array.get_index(0).map(|v| v.get::<i32>()), Some(1));
    assert_eq!(array.get_index(1).map(|v| v.get::<i32>()), Some(2));
}

#[test]
fn array_remove_shifts_later_elements() {
    let array = Value::new_array();
    for n in 0..4 {
        array.push(n);
    }
    assert!(array.remove_index(1));
    let remaining: Vec<i32> = array.elements().iter().map(|v| v.get::<i32>()).collect();
    assert_eq!(remaining, vec![0, 2, 3]);
}

#[test]
fn array_set_index_replaces_in_place() {
    let array = Value::new_array();
    array.push("a");
    array.push("b");
    assert!(array.set_index(1, "c"));
    assert_eq!(array.get_index(1).map(|v| v.get::<String>()), Some("c".to_string()));
    assert_eq!(array.len(), 2);
}

#[test]
fn typed_reads_match_constructors() {
    assert_eq!(Value::from_number(42.0).get::<i32>(), 42);
    assert_eq!(Value::from_number(42.0).get::<u64>(), 42);
    assert_eq!(Value::from_number(2.5).get::<f32>(), 2.5);
    assert!(Value::from_bool(true).get::<bool>());
    assert_eq!(Value::from_string("s").get::<String>(), "s");
}

#[test]
fn typed_reads_default_on_mismatch() {
    let array = Value::new_array();
    assert_eq!(array.get::<i32>(), 0);
    assert!(!array.get::<bool>());
    assert_eq!(array.get::<String>(), "");
    assert_eq!(Value::from_bool(true).get::<f64>(), 0.0);
}

#[test]
fn copying_a_handle_shares_the_store() {
    let original = Value::new_object();
    let copy = original.clone();
    assert_eq!(original.ref_count(), 2);

    copy.set_key("k", "v");
    assert!(original.contains_key("k"));

    drop(copy);
    assert_eq!(original.ref_count(), 1);
    assert_eq!(original.get_key("k").map(|v| v.get::<String>()), Some("v".to_string()));
}

#[test]
fn stored_handles_count_toward_the_store() {
    let child = Value::from_number(1.0);
    let parent = Value::new_array();
    parent.push(&child);
    assert_eq!(child.ref_count(), 2);

    parent.nullify();
    assert_eq!(child.ref_count(), 1);
    assert_eq!(child.get::<i32>(), 1);
}

#[test]
fn nullify_is_idempotent() {
    let value = Value::from_string("gone");
    value.nullify();
    assert_eq!(value.kind(), Kind::Null);
    value.nullify();
    assert_eq!(value.kind(), Kind::Null);
    assert_eq!(value.to_debug_string(), "null");
}

#[test]
fn nullified_value_rejects_container_writes() {
    let value = Value::new_array();
    value.push(1);
    value.nullify();
    assert!(!value.push(2));
    assert!(value.get_index(0).is_none());
}

#[test]
fn debug_strings() {
    assert_eq!(Value::from_number(42.4).to_debug_string(), "42.4");
    assert_eq!(Value::from_bool(true).to_debug_string(), "true");
    assert_eq!(Value::new_null().to_debug_string(), "null");
    assert_eq!(Value::new_array().to_debug_string(), "<array>");

    let object = Value::new_object();
    object.set_key("nested", Value::new_object());
    assert_eq!(object.to_debug_string(), "<object>");
}

#[test]
fn existing_values_are_shared_not_copied() {
    let shared = Value::from_string("x");
    let object = Value::new_object();
    object.set_key("a", &shared);
    object.set_key("b", &shared);
    let a = object.get_key("a").expect("a");
    let b = object.get_key("b").expect("b");
    assert!(a.ptr_eq(&b));

    shared.nullify();
    assert!(a.is_null());
}

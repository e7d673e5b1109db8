//! Purpose: Shared, mutable JSON value handles backed by reference-counted stores.
//! Exports: `Value`, `Kind`, `FromValue`.
//! Role: The data model built by the parser and mutated in place by callers.
//! Invariants: Cloning a `Value` shares its store; the store is released with its last handle.
//! Invariants: The payload always matches the kind; replacing it releases the old payload once.
//! Invariants: Access never fails: mismatched reads return zero values, mismatched writes no-op.
//! Invariants: Handles are `!Send`; a tree lives on the thread that built it.
//! Invariants: Release, comparison, deep copy and cycle checks use heap worklists, never recursion.
//! Notes: Containers refuse insertions that would make a store reachable from itself.
use std::cell::RefCell;
#[cfg(test)]
use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::core::format::format_general;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
enum Payload {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(HashMap<String, Value>),
}

impl Payload {
    fn kind(&self) -> Kind {
        match self {
            Payload::Null => Kind::Null,
            Payload::Bool(_) => Kind::Bool,
            Payload::Number(_) => Kind::Number,
            Payload::String(_) => Kind::String,
            Payload::Array(_) => Kind::Array,
            Payload::Object(_) => Kind::Object,
        }
    }
}

struct Store {
    payload: Payload,
}

impl Store {
    fn new(payload: Payload) -> Self {
        #[cfg(test)]
        LIVE_STORES.with(|live| live.set(live.get() + 1));
        Self { payload }
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        #[cfg(test)]
        LIVE_STORES.with(|live| live.set(live.get() - 1));

        // Children whose last handle lives here are emptied before they drop, so a
        // deep chain is released in a loop instead of one stack frame per level.
        let mut pending = Vec::new();
        take_children(&mut self.payload, &mut pending);
        while let Some(child) = pending.pop() {
            if let Ok(cell) = Rc::try_unwrap(child.store) {
                let mut store = cell.into_inner();
                take_children(&mut store.payload, &mut pending);
            }
        }
    }
}

fn take_children(payload: &mut Payload, pending: &mut Vec<Value>) {
    match payload {
        Payload::Array(elements) => pending.append(elements),
        Payload::Object(entries) => pending.extend(entries.drain().map(|(_, value)| value)),
        _ => {}
    }
}

/// Handle to a JSON value store.
///
/// `Clone` copies the handle, not the value: both handles observe the same
/// payload and mutations through either are visible to both. Use
/// [`Value::deep_clone`] for an independent copy.
#[derive(Clone)]
pub struct Value {
    store: Rc<RefCell<Store>>,
}

impl Value {
    fn from_payload(payload: Payload) -> Self {
        Self {
            store: Rc::new(RefCell::new(Store::new(payload))),
        }
    }

    /// Copies `s` into a buffer owned by the new store.
    pub fn from_string(s: &str) -> Self {
        Self::from_payload(Payload::String(s.to_owned()))
    }

    pub fn from_number(n: f64) -> Self {
        Self::from_payload(Payload::Number(n))
    }

    pub fn from_bool(b: bool) -> Self {
        Self::from_payload(Payload::Bool(b))
    }

    pub fn new_null() -> Self {
        Self::from_payload(Payload::Null)
    }

    pub fn new_array() -> Self {
        Self::from_payload(Payload::Array(Vec::new()))
    }

    pub fn new_object() -> Self {
        Self::from_payload(Payload::Object(HashMap::new()))
    }

    /// Builds an array that takes ownership of `elements` in order.
    pub fn from_elements(elements: impl IntoIterator<Item = Value>) -> Self {
        Self::from_payload(Payload::Array(elements.into_iter().collect()))
    }

    /// Builds an object from `entries`; a repeated key keeps its last value.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self::from_payload(Payload::Object(entries.into_iter().collect()))
    }

    pub fn kind(&self) -> Kind {
        self.store.borrow().payload.kind()
    }

    pub fn is_null(&self) -> bool {
        self.kind() == Kind::Null
    }

    pub fn is_bool(&self) -> bool {
        self.kind() == Kind::Bool
    }

    pub fn is_number(&self) -> bool {
        self.kind() == Kind::Number
    }

    pub fn is_string(&self) -> bool {
        self.kind() == Kind::String
    }

    pub fn is_array(&self) -> bool {
        self.kind() == Kind::Array
    }

    pub fn is_object(&self) -> bool {
        self.kind() == Kind::Object
    }

    /// Reads the payload as `T`, or `T`'s zero value when the kind does not match.
    pub fn get<T: FromValue>(&self) -> T {
        T::from_value(self)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.store.borrow().payload {
            Payload::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.store.borrow().payload {
            Payload::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Runs `f` on a copy of the string payload; `f` may mutate this same value.
    pub fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> Option<R> {
        let text = match &self.store.borrow().payload {
            Payload::String(s) => s.clone(),
            _ => return None,
        };
        Some(f(&text))
    }

    /// Handle to the entry at `key`, sharing its store. `None` when absent or not an object.
    pub fn get_key(&self, key: &str) -> Option<Value> {
        match &self.store.borrow().payload {
            Payload::Object(entries) => entries.get(key).cloned(),
            _ => None,
        }
    }

    /// Handle to the element at `index`, sharing its store. `None` when out of range or not an array.
    pub fn get_index(&self, index: usize) -> Option<Value> {
        match &self.store.borrow().payload {
            Payload::Array(elements) => elements.get(index).cloned(),
            _ => None,
        }
    }

    /// Inserts or overwrites `key`. Returns `false` (and changes nothing) unless this is an object.
    ///
    /// Inserting a non-empty container into a store that has other handles walks the
    /// inserted subtree once (each distinct store visited once) to rule out a cycle.
    pub fn set_key(&self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let value = value.into();
        if self.kind() != Kind::Object || self.refuses(&value) {
            return false;
        }
        let previous = match &mut self.store.borrow_mut().payload {
            Payload::Object(entries) => entries.insert(key.into(), value),
            _ => None,
        };
        // Release the replaced entry only after the store borrow has ended.
        drop(previous);
        true
    }

    /// Replaces the element at `index`. Never grows the array.
    pub fn set_index(&self, index: usize, value: impl Into<Value>) -> bool {
        let value = value.into();
        if index >= self.array_len() || self.refuses(&value) {
            return false;
        }
        let previous = match &mut self.store.borrow_mut().payload {
            Payload::Array(elements) => Some(std::mem::replace(&mut elements[index], value)),
            _ => None,
        };
        drop(previous);
        true
    }

    /// Appends to an array. Same cycle check cost as [`Value::set_key`].
    pub fn push(&self, value: impl Into<Value>) -> bool {
        let value = value.into();
        if self.kind() != Kind::Array || self.refuses(&value) {
            return false;
        }
        if let Payload::Array(elements) = &mut self.store.borrow_mut().payload {
            elements.push(value);
        }
        true
    }

    pub fn remove_key(&self, key: &str) -> bool {
        let removed = match &mut self.store.borrow_mut().payload {
            Payload::Object(entries) => entries.remove(key),
            _ => None,
        };
        removed.is_some()
    }

    /// Removes the element at `index`, shifting later elements down.
    pub fn remove_index(&self, index: usize) -> bool {
        let removed = match &mut self.store.borrow_mut().payload {
            Payload::Array(elements) if index < elements.len() => Some(elements.remove(index)),
            _ => None,
        };
        removed.is_some()
    }

    /// Releases the payload and turns this store into Null. Every handle on the store sees Null.
    pub fn nullify(&self) {
        let previous = std::mem::replace(&mut self.store.borrow_mut().payload, Payload::Null);
        drop(previous);
    }

    /// Element count for arrays, entry count for objects, 0 otherwise.
    pub fn len(&self) -> usize {
        match &self.store.borrow().payload {
            Payload::Array(elements) => elements.len(),
            Payload::Object(entries) => entries.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        match &self.store.borrow().payload {
            Payload::Object(entries) => entries.contains_key(key),
            _ => false,
        }
    }

    /// Object keys in sorted order; empty for every other kind.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = match &self.store.borrow().payload {
            Payload::Object(entries) => entries.keys().cloned().collect::<Vec<_>>(),
            _ => Vec::new(),
        };
        keys.sort();
        keys
    }

    /// Object entries sorted by key; each value shares its store.
    pub fn entries(&self) -> Vec<(String, Value)> {
        let mut entries = match &self.store.borrow().payload {
            Payload::Object(entries) => entries
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect::<Vec<_>>(),
            _ => Vec::new(),
        };
        entries.sort_by(|left, right| left.0.cmp(&right.0));
        entries
    }

    pub fn elements(&self) -> Vec<Value> {
        match &self.store.borrow().payload {
            Payload::Array(elements) => elements.clone(),
            _ => Vec::new(),
        }
    }

    /// Number of live handles on this store.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.store)
    }

    pub fn ptr_eq(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }

    /// Copies the tree into fresh stores that share nothing with `self`.
    pub fn deep_clone(&self) -> Value {
        let root = self.shallow_copy();
        let mut pending = vec![(self.clone(), root.clone())];
        while let Some((source, target)) = pending.pop() {
            let source_store = source.store.borrow();
            let mut target_store = target.store.borrow_mut();
            match (&source_store.payload, &mut target_store.payload) {
                (Payload::Array(elements), Payload::Array(copies)) => {
                    for element in elements {
                        let copy = element.shallow_copy();
                        pending.push((element.clone(), copy.clone()));
                        copies.push(copy);
                    }
                }
                (Payload::Object(entries), Payload::Object(copies)) => {
                    for (key, value) in entries {
                        let copy = value.shallow_copy();
                        pending.push((value.clone(), copy.clone()));
                        copies.insert(key.clone(), copy);
                    }
                }
                _ => {}
            }
        }
        root
    }

    /// Fresh store with the same scalar payload, or an empty container of the same kind.
    fn shallow_copy(&self) -> Value {
        let payload = match &self.store.borrow().payload {
            Payload::Null => Payload::Null,
            Payload::Bool(b) => Payload::Bool(*b),
            Payload::Number(n) => Payload::Number(*n),
            Payload::String(s) => Payload::String(s.clone()),
            Payload::Array(_) => Payload::Array(Vec::new()),
            Payload::Object(_) => Payload::Object(HashMap::new()),
        };
        Value::from_payload(payload)
    }

    /// Short human-readable rendering. Containers render as placeholders, not JSON.
    pub fn to_debug_string(&self) -> String {
        match &self.store.borrow().payload {
            Payload::Null => "null".to_string(),
            Payload::Bool(b) => b.to_string(),
            Payload::Number(n) => format_general(*n),
            Payload::String(s) => s.clone(),
            Payload::Array(_) => "<array>".to_string(),
            Payload::Object(_) => "<object>".to_string(),
        }
    }

    fn array_len(&self) -> usize {
        match &self.store.borrow().payload {
            Payload::Array(elements) => elements.len(),
            _ => 0,
        }
    }

    /// True when storing `value` inside `self` would close a reference cycle.
    fn refuses(&self, value: &Value) -> bool {
        // A store inside `value` holds a handle of its own, so a lone handle cannot be reached.
        if self.ref_count() == 1 && !self.ptr_eq(value) {
            return false;
        }
        if value.has_no_children() && !self.ptr_eq(value) {
            return false;
        }
        if value.reaches(self) {
            tracing::debug!(
                container = %self.kind(),
                "ignoring insert that would make a value contain itself"
            );
            return true;
        }
        false
    }

    fn has_no_children(&self) -> bool {
        match &self.store.borrow().payload {
            Payload::Array(elements) => elements.is_empty(),
            Payload::Object(entries) => entries.is_empty(),
            _ => true,
        }
    }

    fn reaches(&self, target: &Value) -> bool {
        let mut seen = HashSet::new();
        let mut pending = vec![self.clone()];
        while let Some(value) = pending.pop() {
            if value.ptr_eq(target) {
                return true;
            }
            if !seen.insert(Rc::as_ptr(&value.store)) {
                continue;
            }
            match &value.store.borrow().payload {
                Payload::Array(elements) => pending.extend(elements.iter().cloned()),
                Payload::Object(entries) => pending.extend(entries.values().cloned()),
                _ => {}
            }
        }
        false
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::new_null()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self.clone(), other.clone())];
        while let Some((left, right)) = pending.pop() {
            let left_store = left.store.borrow();
            let right_store = right.store.borrow();
            let same = match (&left_store.payload, &right_store.payload) {
                (Payload::Null, Payload::Null) => true,
                (Payload::Bool(a), Payload::Bool(b)) => a == b,
                (Payload::Number(a), Payload::Number(b)) => a == b,
                (Payload::String(a), Payload::String(b)) => a == b,
                (Payload::Array(a), Payload::Array(b)) => {
                    let same_len = a.len() == b.len();
                    if same_len {
                        pending.extend(a.iter().cloned().zip(b.iter().cloned()));
                    }
                    same_len
                }
                (Payload::Object(a), Payload::Object(b)) => {
                    a.len() == b.len()
                        && a.iter().all(|(key, value)| match b.get(key) {
                            Some(other) => {
                                pending.push((value.clone(), other.clone()));
                                true
                            }
                            None => false,
                        })
                }
                _ => false,
            };
            if !same {
                return false;
            }
        }
        true
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.store.try_borrow() {
            Ok(store) => fmt::Debug::fmt(&store.payload, f),
            Err(_) => f.write_str("<borrowed>"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_debug_string())
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::from_string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::from_payload(Payload::String(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::from_bool(b)
    }
}

/// Typed read of a value's payload with a zero-value fallback.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Self;
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Self {
        value.as_bool().unwrap_or_default()
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Self {
        value.with_str(str::to_owned).unwrap_or_default()
    }
}

macro_rules! numeric_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Self {
                    value.as_f64().map(|n| n as $ty).unwrap_or_default()
                }
            }

            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::from_number(n as f64)
                }
            }
        )*
    };
}

numeric_conversions!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

#[cfg(test)]
thread_local! {
    static LIVE_STORES: Cell<usize> = const { Cell::new(0) };
}

#[cfg(test)]
pub(crate) fn live_stores() -> usize {
    LIVE_STORES.with(Cell::get)
}

//! The immutable JSON tree.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::number::{Number, NumberError};

/// Shared, immutable array storage.
pub type Array = Arc<Vec<Value>>;

/// Shared, immutable object storage. Iteration follows insertion order.
pub type Object = Arc<IndexMap<String, Value>>;

/// A JSON value.
///
/// Containers hold their children behind [`Arc`], so cloning a `Value` is
/// cheap and an edit that rebuilds one path leaves every untouched subtree
/// shared with the original.
///
/// Object equality ignores member order.
///
/// Dropping and comparing walk the tree with a heap stack, so neither is
/// limited by nesting depth. `Hash` and `Debug` still recurse.
#[derive(Clone, Debug, Default, Eq)]
pub enum Value {
    #[default]
    Null,
    True,
    False,
    Number(Number),
    String(Arc<str>),
    Array(Array),
    Object(Object),
}

/// Discriminant of a [`Value`], for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    True,
    False,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::True => "true",
            ValueKind::False => "false",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl Value {
    pub fn empty_array() -> Value {
        Value::Array(Arc::new(Vec::new()))
    }

    pub fn empty_object() -> Value {
        Value::Object(Arc::new(IndexMap::new()))
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Arc::new(items))
    }

    pub fn object(entries: IndexMap<String, Value>) -> Value {
        Value::Object(Arc::new(entries))
    }

    /// Number value from an `f64`; NaN and infinities are rejected.
    pub fn number_f64(value: f64) -> Result<Value, NumberError> {
        Number::try_from(value).map(Value::Number)
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::True => ValueKind::True,
            Value::False => ValueKind::False,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::True => Some(true),
            Value::False => Some(false),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Member lookup; `None` for missing keys and non-objects.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key))
    }

    /// Element lookup; `None` when out of bounds and for non-arrays.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|a| a.get(index))
    }
}

// ── Equality ──────────────────────────────────────────────────────────────

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Value::Null, Value::Null) | (Value::True, Value::True) | (Value::False, Value::False) => {}
                (Value::Number(a), Value::Number(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (Value::String(a), Value::String(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (Value::Array(a), Value::Array(b)) => {
                    if Arc::ptr_eq(a, b) {
                        continue;
                    }
                    if a.len() != b.len() {
                        return false;
                    }
                    pending.extend(a.iter().zip(b.iter()));
                }
                (Value::Object(a), Value::Object(b)) => {
                    if Arc::ptr_eq(a, b) {
                        continue;
                    }
                    if a.len() != b.len() {
                        return false;
                    }
                    for (key, value) in a.iter() {
                        match b.get(key) {
                            Some(other) => pending.push((value, other)),
                            None => return false,
                        }
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

// ── Drop ──────────────────────────────────────────────────────────────────

impl Drop for Value {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut value) = pending.pop() {
            detach_children(&mut value, &mut pending);
        }
    }
}

/// Moves the children of a container this value solely owns into `pending`.
/// Shared containers are left alone; their last owner frees them.
fn detach_children(value: &mut Value, pending: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            if let Some(items) = Arc::get_mut(items) {
                pending.append(items);
            }
        }
        Value::Object(entries) => {
            if let Some(entries) = Arc::get_mut(entries) {
                pending.extend(entries.drain(..).map(|(_, child)| child));
            }
        }
        _ => {}
    }
}

// ── Hashing ───────────────────────────────────────────────────────────────

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Value::Null | Value::True | Value::False => {}
            Value::Number(n) => n.hash(state),
            Value::String(s) => s.hash(state),
            Value::Array(a) => a.hash(state),
            Value::Object(o) => {
                // Member order does not take part in equality, so entry
                // hashes are combined with a commutative sum.
                let mut sum: u64 = 0;
                for (key, value) in o.iter() {
                    let mut h = DefaultHasher::new();
                    key.hash(&mut h);
                    value.hash(&mut h);
                    sum = sum.wrapping_add(h.finish());
                }
                o.len().hash(state);
                sum.hash(state);
            }
        }
    }
}

// ── From impls ────────────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        if value {
            Value::True
        } else {
            Value::False
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(Arc::from(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Number(Number::from(value))
                }
            }
        )*
    };
}

value_from_int!(i32, i64, u32, u64);

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Value::object(entries)
    }
}

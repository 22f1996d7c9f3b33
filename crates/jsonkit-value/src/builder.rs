//! Array and object builders.
//!
//! A builder is consumed by `build`, so the tree it returns can never be
//! changed through the builder afterwards.

use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::value::{Object, Value};

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("DUPLICATE_KEY: {0}")]
    DuplicateKey(String),
    #[error("INDEX_OUT_OF_BOUNDS: {index} (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

// ── Duplicate key policy ──────────────────────────────────────────────────

/// What an [`ObjectBuilder`] does when a key is added twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateKeyPolicy {
    /// Keep the first value and ignore later ones.
    First,
    /// Overwrite with the latest value; the key keeps its original position.
    #[default]
    Last,
    /// Reject the second occurrence with [`ValueError::DuplicateKey`].
    None,
}

// ── ArrayBuilder ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ArrayBuilder {
    items: Vec<Value>,
}

impl ArrayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ArrayBuilder {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Seeds the builder with the elements of an existing array.
    pub fn from_array(items: &[Value]) -> Self {
        ArrayBuilder {
            items: items.to_vec(),
        }
    }

    pub fn push(&mut self, value: impl Into<Value>) -> &mut Self {
        self.items.push(value.into());
        self
    }

    /// Inserts at `index`, shifting later elements; `index == len` appends.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> Result<&mut Self, ValueError> {
        if index > self.items.len() {
            return Err(self.out_of_bounds(index));
        }
        self.items.insert(index, value.into());
        Ok(self)
    }

    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<&mut Self, ValueError> {
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                Ok(self)
            }
            None => Err(self.out_of_bounds(index)),
        }
    }

    pub fn remove(&mut self, index: usize) -> Result<Value, ValueError> {
        if index >= self.items.len() {
            return Err(self.out_of_bounds(index));
        }
        Ok(self.items.remove(index))
    }

    pub fn extend<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.items.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn build(self) -> Value {
        Value::Array(Arc::new(self.items))
    }

    fn out_of_bounds(&self, index: usize) -> ValueError {
        ValueError::IndexOutOfBounds {
            index,
            len: self.items.len(),
        }
    }
}

// ── ObjectBuilder ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ObjectBuilder {
    entries: IndexMap<String, Value>,
    policy: DuplicateKeyPolicy,
}

impl ObjectBuilder {
    pub fn new(policy: DuplicateKeyPolicy) -> Self {
        ObjectBuilder {
            entries: IndexMap::new(),
            policy,
        }
    }

    /// Seeds the builder with the members of an existing object.
    pub fn from_object(object: &Object, policy: DuplicateKeyPolicy) -> Self {
        ObjectBuilder {
            entries: (**object).clone(),
            policy,
        }
    }

    pub fn policy(&self) -> DuplicateKeyPolicy {
        self.policy
    }

    /// Adds a member, resolving a repeated key through the builder's policy.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<&mut Self, ValueError> {
        let key = key.into();
        match self.policy {
            DuplicateKeyPolicy::Last => {
                self.entries.insert(key, value.into());
            }
            DuplicateKeyPolicy::First => {
                self.entries.entry(key).or_insert_with(|| value.into());
            }
            DuplicateKeyPolicy::None => {
                if self.entries.contains_key(&key) {
                    return Err(ValueError::DuplicateKey(key));
                }
                self.entries.insert(key, value.into());
            }
        }
        Ok(self)
    }

    /// Removes a member, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Adds every entry through [`ObjectBuilder::add`].
    pub fn extend<I, K, V>(&mut self, entries: I) -> Result<&mut Self, ValueError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            self.add(key, value)?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> Value {
        Value::Object(Arc::new(self.entries))
    }
}

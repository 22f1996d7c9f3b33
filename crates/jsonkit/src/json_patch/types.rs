//! Core types for the JSON Patch module.

use jsonkit_pointer::{JsonPointer, PointerError};
use jsonkit_value::Value;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error(transparent)]
    Pointer(#[from] PointerError),
    #[error("TEST: value at {0:?} does not match")]
    TestFailed(String),
    #[error("INVALID_MOVE: cannot move {from:?} into its own child {path:?}")]
    InvalidMove { from: String, path: String },
    #[error("INVALID_OP: {0}")]
    InvalidOperation(String),
}

// ── Operation ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Add { path: JsonPointer, value: Value },
    Remove { path: JsonPointer },
    Replace { path: JsonPointer, value: Value },
    Move { from: JsonPointer, path: JsonPointer },
    Copy { from: JsonPointer, path: JsonPointer },
    Test { path: JsonPointer, value: Value },
}

impl Op {
    /// The `op` member of the wire form.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Add { .. } => "add",
            Op::Remove { .. } => "remove",
            Op::Replace { .. } => "replace",
            Op::Move { .. } => "move",
            Op::Copy { .. } => "copy",
            Op::Test { .. } => "test",
        }
    }

    pub fn path(&self) -> &JsonPointer {
        match self {
            Op::Add { path, .. }
            | Op::Remove { path }
            | Op::Replace { path, .. }
            | Op::Move { path, .. }
            | Op::Copy { path, .. }
            | Op::Test { path, .. } => path,
        }
    }

    pub fn from(&self) -> Option<&JsonPointer> {
        match self {
            Op::Move { from, .. } | Op::Copy { from, .. } => Some(from),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Op::Add { value, .. } | Op::Replace { value, .. } | Op::Test { value, .. } => Some(value),
            _ => None,
        }
    }
}

// ── Patch ─────────────────────────────────────────────────────────────────

/// An ordered list of operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonPatch {
    ops: Vec<Op>,
}

impl JsonPatch {
    pub fn new(ops: Vec<Op>) -> Self {
        JsonPatch { ops }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Applies every operation in order and returns the final document.
    pub fn apply(&self, document: &Value) -> Result<Value, PatchError> {
        super::apply::apply_patch(document, &self.ops)
    }

    /// Decodes the RFC 6902 array form.
    pub fn from_value(value: &Value) -> Result<Self, PatchError> {
        super::codec::from_value(value)
    }

    pub fn to_value(&self) -> Value {
        super::codec::to_value(self)
    }
}

impl From<Vec<Op>> for JsonPatch {
    fn from(ops: Vec<Op>) -> Self {
        JsonPatch::new(ops)
    }
}

impl FromIterator<Op> for JsonPatch {
    fn from_iter<I: IntoIterator<Item = Op>>(iter: I) -> Self {
        JsonPatch::new(iter.into_iter().collect())
    }
}

impl IntoIterator for JsonPatch {
    type Item = Op;
    type IntoIter = std::vec::IntoIter<Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a JsonPatch {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

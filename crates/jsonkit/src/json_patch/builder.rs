use jsonkit_pointer::JsonPointer;
use jsonkit_value::Value;

use super::types::{JsonPatch, Op, PatchError};

/// Fluent construction of a [`JsonPatch`] from pointer text.
///
/// Each call parses its pointers up front, so a malformed pointer is reported
/// where it is written rather than when the patch is applied.
///
/// ```
/// use jsonkit::PatchBuilder;
///
/// let mut builder = PatchBuilder::new();
/// builder.add("/a", 1)?.test("/a", 1)?.move_value("/a", "/b")?;
/// let patch = builder.build();
/// assert_eq!(patch.len(), 3);
/// # Ok::<(), jsonkit::PatchError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatchBuilder {
    ops: Vec<Op>,
}

fn pointer(text: &str) -> Result<JsonPointer, PatchError> {
    Ok(text.parse::<JsonPointer>()?)
}

impl PatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: &str, value: impl Into<Value>) -> Result<&mut Self, PatchError> {
        let path = pointer(path)?;
        Ok(self.push(Op::Add {
            path,
            value: value.into(),
        }))
    }

    pub fn remove(&mut self, path: &str) -> Result<&mut Self, PatchError> {
        let path = pointer(path)?;
        Ok(self.push(Op::Remove { path }))
    }

    pub fn replace(&mut self, path: &str, value: impl Into<Value>) -> Result<&mut Self, PatchError> {
        let path = pointer(path)?;
        Ok(self.push(Op::Replace {
            path,
            value: value.into(),
        }))
    }

    pub fn move_value(&mut self, from: &str, path: &str) -> Result<&mut Self, PatchError> {
        let from = pointer(from)?;
        let path = pointer(path)?;
        Ok(self.push(Op::Move { from, path }))
    }

    pub fn copy(&mut self, from: &str, path: &str) -> Result<&mut Self, PatchError> {
        let from = pointer(from)?;
        let path = pointer(path)?;
        Ok(self.push(Op::Copy { from, path }))
    }

    pub fn test(&mut self, path: &str, value: impl Into<Value>) -> Result<&mut Self, PatchError> {
        let path = pointer(path)?;
        Ok(self.push(Op::Test {
            path,
            value: value.into(),
        }))
    }

    pub fn push(&mut self, op: Op) -> &mut Self {
        self.ops.push(op);
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn build(self) -> JsonPatch {
        JsonPatch::new(self.ops)
    }
}

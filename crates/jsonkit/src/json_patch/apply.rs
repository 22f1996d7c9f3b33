//! JSON Patch apply logic.

use jsonkit_pointer::JsonPointer;
use jsonkit_value::Value;

use super::types::{Op, PatchError};

// ── Individual operation applicators ─────────────────────────────────────

fn apply_copy(document: &Value, from: &JsonPointer, path: &JsonPointer) -> Result<Value, PatchError> {
    let value = from.get_value(document)?.clone();
    Ok(path.add(document, value)?)
}

/// Removes at `from`, then adds at `path` against the already shrunken
/// document, so array indexes in `path` refer to the post-removal layout.
fn apply_move(document: &Value, from: &JsonPointer, path: &JsonPointer) -> Result<Value, PatchError> {
    if from == path {
        from.get_value(document)?;
        return Ok(document.clone());
    }
    if from.is_prefix_of(path) {
        return Err(PatchError::InvalidMove {
            from: from.to_string(),
            path: path.to_string(),
        });
    }
    let value = from.get_value(document)?.clone();
    let removed = from.remove(document)?;
    Ok(path.add(&removed, value)?)
}

fn apply_test(document: &Value, path: &JsonPointer, expected: &Value) -> Result<Value, PatchError> {
    if path.get_value(document)? != expected {
        return Err(PatchError::TestFailed(path.to_string()));
    }
    Ok(document.clone())
}

// ── Public API ────────────────────────────────────────────────────────────

/// Applies one operation and returns the resulting document.
pub fn apply_op(document: &Value, op: &Op) -> Result<Value, PatchError> {
    match op {
        Op::Add { path, value } => Ok(path.add(document, value.clone())?),
        Op::Remove { path } => Ok(path.remove(document)?),
        Op::Replace { path, value } => Ok(path.replace(document, value.clone())?),
        Op::Move { from, path } => apply_move(document, from, path),
        Op::Copy { from, path } => apply_copy(document, from, path),
        Op::Test { path, value } => apply_test(document, path, value),
    }
}

/// Applies `ops` in order. On error nothing but the error is returned.
pub fn apply_patch(document: &Value, ops: &[Op]) -> Result<Value, PatchError> {
    let mut current = document.clone();
    for (index, op) in ops.iter().enumerate() {
        current = apply_op(&current, op).inspect_err(|e| {
            log::debug!("patch op {index} ({} {}) failed: {e}", op.name(), op.path());
        })?;
        log::trace!("applied patch op {index}: {} {}", op.name(), op.path());
    }
    log::debug!("applied {} patch operations", ops.len());
    Ok(current)
}

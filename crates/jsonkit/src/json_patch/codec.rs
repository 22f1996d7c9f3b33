//! Wire form of JSON Patch operations.
//!
//! A patch is an array of objects with an `op` member; `path` and `from` are
//! pointer text. `value` is only read for add/replace/test and `from` only for
//! move/copy; other members are ignored.

use indexmap::IndexMap;
use jsonkit_pointer::JsonPointer;
use jsonkit_value::Value;

use super::types::{JsonPatch, Op, PatchError};

fn invalid(message: impl Into<String>) -> PatchError {
    PatchError::InvalidOperation(message.into())
}

fn pointer_member(entries: &IndexMap<String, Value>, name: &str) -> Result<JsonPointer, PatchError> {
    let text = entries
        .get(name)
        .ok_or_else(|| invalid(format!("missing {name:?}")))?
        .as_str()
        .ok_or_else(|| invalid(format!("{name:?} must be a string")))?;
    text.parse::<JsonPointer>()
        .map_err(|e| invalid(format!("{name:?} is not a valid pointer: {e}")))
}

fn value_member(entries: &IndexMap<String, Value>) -> Result<Value, PatchError> {
    entries
        .get("value")
        .cloned()
        .ok_or_else(|| invalid("missing \"value\""))
}

// ── Decoding ──────────────────────────────────────────────────────────────

pub fn op_from_value(value: &Value) -> Result<Op, PatchError> {
    let entries = value
        .as_object()
        .ok_or_else(|| invalid(format!("operation must be an object, got {}", value.kind().as_str())))?;
    let name = entries
        .get("op")
        .ok_or_else(|| invalid("missing \"op\""))?
        .as_str()
        .ok_or_else(|| invalid("\"op\" must be a string"))?;
    let path = pointer_member(entries, "path")?;
    let op = match name {
        "add" => Op::Add {
            path,
            value: value_member(entries)?,
        },
        "remove" => Op::Remove { path },
        "replace" => Op::Replace {
            path,
            value: value_member(entries)?,
        },
        "move" => Op::Move {
            from: pointer_member(entries, "from")?,
            path,
        },
        "copy" => Op::Copy {
            from: pointer_member(entries, "from")?,
            path,
        },
        "test" => Op::Test {
            path,
            value: value_member(entries)?,
        },
        other => return Err(invalid(format!("unknown op {other:?}"))),
    };
    Ok(op)
}

pub fn from_value(value: &Value) -> Result<JsonPatch, PatchError> {
    let items = value
        .as_array()
        .ok_or_else(|| invalid("patch must be an array"))?;
    items.iter().map(op_from_value).collect()
}

// ── Encoding ──────────────────────────────────────────────────────────────

pub fn op_to_value(op: &Op) -> Value {
    let mut entries = IndexMap::with_capacity(4);
    entries.insert("op".to_string(), Value::from(op.name()));
    if let Some(from) = op.from() {
        entries.insert("from".to_string(), Value::from(from.to_string()));
    }
    entries.insert("path".to_string(), Value::from(op.path().to_string()));
    if let Some(value) = op.value() {
        entries.insert("value".to_string(), value.clone());
    }
    Value::object(entries)
}

pub fn to_value(patch: &JsonPatch) -> Value {
    Value::array(patch.ops().iter().map(op_to_value).collect())
}

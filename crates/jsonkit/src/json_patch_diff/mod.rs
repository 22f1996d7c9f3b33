//! JSON Patch diff: generate a JSON Patch from two document values.
//!
//! Objects are compared member by member. Arrays keep their common prefix
//! and suffix, pair up the differing middle positionally and then remove or
//! append whatever is left over. Anything else that differs is replaced.

use jsonkit_pointer::JsonPointer;
use jsonkit_value::{IndexMap, Value};

use crate::json_patch::{JsonPatch, Op};

// ── Public API ────────────────────────────────────────────────────────────

/// Generates a patch that turns `source` into `target`.
///
/// Applying the result to `source` yields a document equal to `target`.
pub fn diff(source: &Value, target: &Value) -> JsonPatch {
    let mut ops = Vec::new();
    diff_at(&mut ops, &JsonPointer::root(), source, target);
    JsonPatch::new(ops)
}

// ── Core recursive differ ─────────────────────────────────────────────────

fn diff_at(ops: &mut Vec<Op>, path: &JsonPointer, source: &Value, target: &Value) {
    if source == target {
        return;
    }
    match (source, target) {
        (Value::Object(s), Value::Object(t)) => diff_object(ops, path, s, t),
        (Value::Array(s), Value::Array(t)) => diff_array(ops, path, s, t),
        _ => ops.push(Op::Replace {
            path: path.clone(),
            value: target.clone(),
        }),
    }
}

fn child(path: &JsonPointer, token: impl Into<String>) -> JsonPointer {
    let mut child = path.clone();
    child.push(token);
    child
}

fn diff_object(
    ops: &mut Vec<Op>,
    path: &JsonPointer,
    source: &IndexMap<String, Value>,
    target: &IndexMap<String, Value>,
) {
    for (key, s) in source {
        match target.get(key) {
            Some(t) => diff_at(ops, &child(path, key.as_str()), s, t),
            None => ops.push(Op::Remove {
                path: child(path, key.as_str()),
            }),
        }
    }
    for (key, t) in target {
        if !source.contains_key(key) {
            ops.push(Op::Add {
                path: child(path, key.as_str()),
                value: t.clone(),
            });
        }
    }
}

fn diff_array(ops: &mut Vec<Op>, path: &JsonPointer, source: &[Value], target: &[Value]) {
    let prefix = source
        .iter()
        .zip(target)
        .take_while(|(s, t)| s == t)
        .count();
    let room = source.len().min(target.len()) - prefix;
    let suffix = source
        .iter()
        .rev()
        .zip(target.iter().rev())
        .take(room)
        .take_while(|(s, t)| s == t)
        .count();
    let source_mid = &source[prefix..source.len() - suffix];
    let target_mid = &target[prefix..target.len() - suffix];
    let paired = source_mid.len().min(target_mid.len());

    for (offset, (s, t)) in source_mid.iter().zip(target_mid).enumerate() {
        let mut at = path.clone();
        at.append_index(prefix + offset);
        diff_at(ops, &at, s, t);
    }
    // Surplus source elements all sit at the same index once earlier ones go.
    for _ in paired..source_mid.len() {
        let mut at = path.clone();
        at.append_index(prefix + paired);
        ops.push(Op::Remove { path: at });
    }
    for (offset, t) in target_mid.iter().enumerate().skip(paired) {
        let mut at = path.clone();
        at.append_index(prefix + offset);
        ops.push(Op::Add {
            path: at,
            value: t.clone(),
        });
    }
}

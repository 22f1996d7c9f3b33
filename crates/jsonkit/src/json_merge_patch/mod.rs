//! JSON Merge Patch (RFC 7396).
//!
//! A merge patch mirrors the shape of the document it edits: object members
//! are merged recursively, `null` deletes a member and any non-object value
//! replaces what it lands on. Arrays are replaced as a whole.
//!
//! A member the target does not have yet is added exactly as the patch
//! spells it, nested `null`s included. RFC 7396 would strip those.

use std::sync::Arc;

use jsonkit_value::{IndexMap, Value};

/// Applies `patch` to `target` and returns the merged document.
pub fn apply(target: &Value, patch: &Value) -> Value {
    let Value::Object(members) = patch else {
        return patch.clone();
    };
    let mut entries = match target {
        Value::Object(existing) => IndexMap::clone(existing),
        _ => IndexMap::with_capacity(members.len()),
    };
    for (key, value) in members.iter() {
        if value.is_null() {
            entries.shift_remove(key);
            continue;
        }
        let merged = match entries.get(key) {
            Some(current) => apply(current, value),
            None => value.clone(),
        };
        entries.insert(key.clone(), merged);
    }
    Value::Object(Arc::new(entries))
}

/// Computes a merge patch that turns `source` into `target`.
///
/// A patch cannot set an existing member to `null`, so when `target` does
/// the round trip through [`apply`] deletes that member instead.
pub fn diff(source: &Value, target: &Value) -> Value {
    let (Value::Object(source), Value::Object(target)) = (source, target) else {
        return target.clone();
    };
    let mut patch = IndexMap::new();
    for (key, old) in source.iter() {
        match target.get(key) {
            None => {
                patch.insert(key.clone(), Value::Null);
            }
            Some(new) if new != old => {
                patch.insert(key.clone(), diff(old, new));
            }
            Some(_) => {}
        }
    }
    for (key, new) in target.iter() {
        if !source.contains_key(key) {
            patch.insert(key.clone(), new.clone());
        }
    }
    Value::Object(Arc::new(patch))
}

// ── Patch value wrapper ───────────────────────────────────────────────────

/// A merge patch document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonMergePatch {
    patch: Value,
}

impl JsonMergePatch {
    pub fn new(patch: Value) -> Self {
        JsonMergePatch { patch }
    }

    /// The patch that turns `source` into `target`.
    pub fn diff(source: &Value, target: &Value) -> Self {
        JsonMergePatch::new(diff(source, target))
    }

    pub fn apply(&self, target: &Value) -> Value {
        let out = apply(target, &self.patch);
        log::debug!("applied merge patch ({} onto {})", self.patch.kind().as_str(), target.kind().as_str());
        out
    }

    pub fn to_value(&self) -> &Value {
        &self.patch
    }

    pub fn into_value(self) -> Value {
        self.patch
    }
}

impl From<Value> for JsonMergePatch {
    fn from(patch: Value) -> Self {
        JsonMergePatch::new(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonkit_stream::{from_str, to_string};

    fn json(text: &str) -> Value {
        from_str(text).unwrap()
    }

    #[test]
    fn rfc_example() {
        let target = json(
            r#"{"title": "Goodbye!", "author": {"givenName": "John", "familyName": "Doe"},
                "tags": ["example", "sample"], "content": "This will be unchanged"}"#,
        );
        let patch = json(
            r#"{"title": "Hello!", "phoneNumber": "+01-123-456-7890",
                "author": {"familyName": null}, "tags": ["example"]}"#,
        );
        let out = apply(&target, &patch);
        assert_eq!(
            to_string(&out).unwrap(),
            r#"{"title":"Hello!","author":{"givenName":"John"},"tags":["example"],"content":"This will be unchanged","phoneNumber":"+01-123-456-7890"}"#
        );
    }

    #[test]
    fn added_members_are_copied_verbatim() {
        let out = apply(&json(r#"{"a": 1}"#), &json(r#"{"b": {"c": null}}"#));
        assert_eq!(out, json(r#"{"a": 1, "b": {"c": null}}"#));

        let out = apply(&json("{}"), &json(r#"{"a": {"bb": {"ccc": null}}}"#));
        assert_eq!(out, json(r#"{"a": {"bb": {"ccc": null}}}"#));

        // Members that already exist still merge, so their nulls delete.
        let out = apply(&json(r#"{"b": {"c": 1, "d": 2}}"#), &json(r#"{"b": {"c": null}}"#));
        assert_eq!(out, json(r#"{"b": {"d": 2}}"#));
    }

    #[test]
    fn added_member_shares_patch_subtree() {
        let patch = json(r#"{"b": [1, 2]}"#);
        let out = apply(&json("{}"), &patch);
        let (Some(Value::Array(added)), Some(Value::Array(source))) = (out.get("b"), patch.get("b")) else {
            panic!("expected arrays");
        };
        assert!(Arc::ptr_eq(added, source));
    }

    #[test]
    fn non_object_cases() {
        assert_eq!(apply(&json(r#"{"a": 1}"#), &json("[1]")), json("[1]"));
        assert_eq!(apply(&json("[1]"), &json(r#"{"a": 1}"#)), json(r#"{"a": 1}"#));
        assert_eq!(apply(&json("1"), &json("null")), Value::Null);
        assert_eq!(apply(&json(r#"{"a": 1}"#), &json("{}")), json(r#"{"a": 1}"#));
    }

    #[test]
    fn diff_then_apply() {
        let source = json(r#"{"a": 1, "b": {"c": [1], "d": true}, "e": "x"}"#);
        let target = json(r#"{"a": 1, "b": {"c": [2], "f": 3}, "g": {"h": 1}}"#);
        let patch = JsonMergePatch::diff(&source, &target);
        assert_eq!(
            patch.to_value(),
            &json(r#"{"b": {"c": [2], "d": null, "f": 3}, "e": null, "g": {"h": 1}}"#)
        );
        assert_eq!(patch.apply(&source), target);
        assert_eq!(JsonMergePatch::diff(&source, &source).into_value(), json("{}"));
        assert_eq!(diff(&json("[1]"), &json("[2]")), json("[2]"));
    }
}

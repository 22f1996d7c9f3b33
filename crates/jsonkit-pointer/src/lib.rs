//! JSON Pointer (RFC 6901).
//!
//! A [`JsonPointer`] addresses a location inside a [`Value`]. Besides lookup it
//! offers the three structural edits JSON Patch is built on (`add`, `remove`,
//! `replace`). Edits never touch the input: they return a new tree in which
//! only the nodes on the path to the root are rebuilt, so every untouched
//! subtree stays shared with the original.
//!
//! # Example
//!
//! ```
//! use jsonkit_pointer::JsonPointer;
//! use jsonkit_value::Value;
//!
//! let doc = Value::array(vec![Value::from(1)]);
//! let append: JsonPointer = "/-".parse().unwrap();
//! let doc = append.add(&doc, Value::from(2)).unwrap();
//! assert_eq!(doc, Value::array(vec![Value::from(1), Value::from(2)]));
//!
//! let second: JsonPointer = "/1".parse().unwrap();
//! assert_eq!(second.resolve(&doc), Some(&Value::from(2)));
//! assert_eq!(second.to_string(), "/1");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use jsonkit_value::{IndexMap, Value};
use thiserror::Error;

pub mod util;
pub use util::{escape_component, is_valid_index, unescape_component};

use util::parse_index;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("POINTER_INVALID: {0}")]
    Syntax(String),
    #[error("NOT_FOUND: {0}")]
    PathNotFound(String),
    #[error("CANNOT_REMOVE_ROOT")]
    CannotRemoveRoot,
}

/// A parsed pointer: the sequence of unescaped reference tokens.
///
/// The empty pointer (`""`) addresses the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        JsonPointer {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// The pointer one level up, or `None` for the root.
    pub fn parent(&self) -> Option<JsonPointer> {
        let (_, spine) = self.tokens.split_last()?;
        Some(JsonPointer {
            tokens: spine.to_vec(),
        })
    }

    pub fn push(&mut self, token: impl Into<String>) -> &mut Self {
        self.tokens.push(token.into());
        self
    }

    pub fn append_index(&mut self, index: usize) -> &mut Self {
        self.push(index.to_string())
    }

    /// True when `other` is this pointer or lies below it.
    pub fn is_prefix_of(&self, other: &JsonPointer) -> bool {
        other.tokens.starts_with(&self.tokens)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Walks the document. A scalar on the way, a missing key or an index
    /// outside the array ends resolution with `None`.
    pub fn resolve<'v>(&self, document: &'v Value) -> Option<&'v Value> {
        self.tokens
            .iter()
            .try_fold(document, |current, token| step(current, token))
    }

    pub fn get_value<'v>(&self, document: &'v Value) -> Result<&'v Value, PointerError> {
        self.resolve(document).ok_or_else(|| self.not_found())
    }

    pub fn contains_value(&self, document: &Value) -> bool {
        self.resolve(document).is_some()
    }

    // ── Edits ─────────────────────────────────────────────────────────────

    /// Inserts `value` at this location.
    ///
    /// On an array the last token is an index in `0..=len` (insertion shifts
    /// later elements) or `-` to append. On an object the member is created or
    /// overwritten in place. The parent must already exist.
    pub fn add(&self, document: &Value, value: Value) -> Result<Value, PointerError> {
        let Some((last, spine)) = self.tokens.split_last() else {
            return Ok(value);
        };
        self.rebuild(document, spine, |container| match container {
            Value::Array(items) => {
                let index = if last == "-" {
                    items.len()
                } else {
                    parse_index(last)
                        .filter(|&index| index <= items.len())
                        .ok_or_else(|| self.not_found())?
                };
                let mut items = Vec::clone(items);
                items.insert(index, value);
                Ok(Value::Array(Arc::new(items)))
            }
            Value::Object(entries) => {
                let mut entries = IndexMap::clone(entries);
                entries.insert(last.clone(), value);
                Ok(Value::Object(Arc::new(entries)))
            }
            _ => Err(self.not_found()),
        })
    }

    /// Removes the addressed member; the remaining keys keep their order.
    pub fn remove(&self, document: &Value) -> Result<Value, PointerError> {
        let Some((last, spine)) = self.tokens.split_last() else {
            return Err(PointerError::CannotRemoveRoot);
        };
        self.rebuild(document, spine, |container| match container {
            Value::Array(items) => {
                let index = parse_index(last)
                    .filter(|&index| index < items.len())
                    .ok_or_else(|| self.not_found())?;
                let mut items = Vec::clone(items);
                items.remove(index);
                Ok(Value::Array(Arc::new(items)))
            }
            Value::Object(entries) => {
                let mut entries = IndexMap::clone(entries);
                entries.shift_remove(last.as_str()).ok_or_else(|| self.not_found())?;
                Ok(Value::Object(Arc::new(entries)))
            }
            _ => Err(self.not_found()),
        })
    }

    pub fn replace(&self, document: &Value, value: Value) -> Result<Value, PointerError> {
        let Some((last, spine)) = self.tokens.split_last() else {
            return Ok(value);
        };
        self.rebuild(document, spine, |container| match container {
            Value::Array(items) => {
                let index = parse_index(last)
                    .filter(|&index| index < items.len())
                    .ok_or_else(|| self.not_found())?;
                let mut items = Vec::clone(items);
                items[index] = value;
                Ok(Value::Array(Arc::new(items)))
            }
            Value::Object(entries) if entries.contains_key(last.as_str()) => {
                let mut entries = IndexMap::clone(entries);
                entries.insert(last.clone(), value);
                Ok(Value::Object(Arc::new(entries)))
            }
            _ => Err(self.not_found()),
        })
    }

    /// Descends along `spine`, applies `edit` to the container found there,
    /// then copies each ancestor with its child swapped for the new one.
    fn rebuild<F>(&self, document: &Value, spine: &[String], edit: F) -> Result<Value, PointerError>
    where
        F: FnOnce(&Value) -> Result<Value, PointerError>,
    {
        let mut ancestors = Vec::with_capacity(spine.len());
        let mut current = document;
        for token in spine {
            let child = step(current, token).ok_or_else(|| self.not_found())?;
            ancestors.push(current);
            current = child;
        }
        let mut value = edit(current)?;
        for (ancestor, token) in ancestors.into_iter().zip(spine).rev() {
            value = with_child(ancestor, token, value);
        }
        Ok(value)
    }

    fn not_found(&self) -> PointerError {
        PointerError::PathNotFound(self.to_string())
    }
}

fn step<'v>(value: &'v Value, token: &str) -> Option<&'v Value> {
    match value {
        Value::Array(items) => parse_index(token).and_then(|index| items.get(index)),
        Value::Object(entries) => entries.get(token),
        _ => None,
    }
}

// Only called for tokens `step` already resolved, so the slot exists.
fn with_child(parent: &Value, token: &str, child: Value) -> Value {
    match parent {
        Value::Array(items) => {
            let mut items = Vec::clone(items);
            if let Some(slot) = parse_index(token).and_then(|index| items.get_mut(index)) {
                *slot = child;
            }
            Value::Array(Arc::new(items))
        }
        Value::Object(entries) => {
            let mut entries = IndexMap::clone(entries);
            entries.insert(token.to_string(), child);
            Value::Object(Arc::new(entries))
        }
        _ => child,
    }
}

// ── Text form ─────────────────────────────────────────────────────────────

impl FromStr for JsonPointer {
    type Err = PointerError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.is_empty() {
            return Ok(JsonPointer::root());
        }
        let Some(rest) = text.strip_prefix('/') else {
            return Err(PointerError::Syntax(format!("{text:?} does not start with /")));
        };
        let tokens = rest
            .split('/')
            .map(unescape_component)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(JsonPointer { tokens })
    }
}

impl TryFrom<&str> for JsonPointer {
    type Error = PointerError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", escape_component(token))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonkit_stream::from_str as json;

    fn ptr(text: &str) -> JsonPointer {
        text.parse().unwrap()
    }

    #[test]
    fn parse_and_display() {
        assert!(ptr("").is_root());
        assert_eq!(ptr("/").tokens(), [""]);
        assert_eq!(ptr("/a~1b/c~0d/0").tokens(), ["a/b", "c~d", "0"]);
        for text in ["", "/", "//", "/a~1b/c~0d", "/-", "/ "] {
            assert_eq!(ptr(text).to_string(), text);
        }
        assert!(matches!("a/b".parse::<JsonPointer>(), Err(PointerError::Syntax(_))));
        assert!(matches!("/a~".parse::<JsonPointer>(), Err(PointerError::Syntax(_))));
        assert!(matches!("/~3".parse::<JsonPointer>(), Err(PointerError::Syntax(_))));
    }

    #[test]
    fn structure_helpers() {
        let mut p = JsonPointer::root();
        p.push("a/b").append_index(3);
        assert_eq!(p.to_string(), "/a~1b/3");
        assert_eq!(p.last(), Some("3"));
        assert_eq!(p.parent(), Some(JsonPointer::from_tokens(["a/b"])));
        assert_eq!(JsonPointer::root().parent(), None);
        assert!(JsonPointer::root().is_prefix_of(&p));
        assert!(p.is_prefix_of(&p));
        assert!(!p.is_prefix_of(&ptr("/a~1b")));
        assert!(!ptr("/a").is_prefix_of(&ptr("/ab")));
    }

    #[test]
    fn resolve_rules() {
        let doc = json(r#"{"a": [10, {"b": null}], "01": 1, "s": "text"}"#).unwrap();
        assert_eq!(ptr("").resolve(&doc), Some(&doc));
        assert_eq!(ptr("/a/0").resolve(&doc), Some(&Value::from(10)));
        assert_eq!(ptr("/a/1/b").resolve(&doc), Some(&Value::Null));
        assert_eq!(ptr("/01").resolve(&doc), Some(&Value::from(1)));
        assert_eq!(ptr("/a/01").resolve(&doc), None);
        assert_eq!(ptr("/a/2").resolve(&doc), None);
        assert_eq!(ptr("/a/-").resolve(&doc), None);
        assert_eq!(ptr("/s/0").resolve(&doc), None);
        assert!(ptr("/a/1/b").contains_value(&doc));
        assert!(!ptr("/missing").contains_value(&doc));
        assert_eq!(
            ptr("/missing").get_value(&doc),
            Err(PointerError::PathNotFound("/missing".into()))
        );
    }

    #[test]
    fn add_inserts_and_appends() {
        let doc = json(r#"{"list": [1, 3]}"#).unwrap();
        let doc = ptr("/list/1").add(&doc, Value::from(2)).unwrap();
        let doc = ptr("/list/-").add(&doc, Value::from(4)).unwrap();
        let doc = ptr("/list/4").add(&doc, Value::from(5)).unwrap();
        assert_eq!(doc, json(r#"{"list": [1, 2, 3, 4, 5]}"#).unwrap());

        assert!(matches!(
            ptr("/list/7").add(&doc, Value::Null),
            Err(PointerError::PathNotFound(_))
        ));
        assert!(matches!(
            ptr("/nope/x").add(&doc, Value::Null),
            Err(PointerError::PathNotFound(_))
        ));
        assert!(matches!(
            ptr("/list/0/x").add(&doc, Value::Null),
            Err(PointerError::PathNotFound(_))
        ));
        assert_eq!(ptr("").add(&doc, Value::True).unwrap(), Value::True);
    }

    #[test]
    fn add_overwrites_member_in_place() {
        let doc = json(r#"{"a": 1, "b": 2, "c": 3}"#).unwrap();
        let doc = ptr("/b").add(&doc, Value::from("x")).unwrap();
        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(doc.get("b"), Some(&Value::from("x")));
    }

    #[test]
    fn remove_rules() {
        let doc = json(r#"{"a": 1, "b": [1, 2], "c": 3}"#).unwrap();
        let out = ptr("/a").remove(&doc).unwrap();
        let keys: Vec<&str> = out.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "c"]);
        assert_eq!(
            ptr("/b/0").remove(&doc).unwrap(),
            json(r#"{"a": 1, "b": [2], "c": 3}"#).unwrap()
        );
        assert_eq!(ptr("").remove(&doc), Err(PointerError::CannotRemoveRoot));
        assert!(matches!(ptr("/zz").remove(&doc), Err(PointerError::PathNotFound(_))));
        assert!(matches!(ptr("/b/2").remove(&doc), Err(PointerError::PathNotFound(_))));
        assert!(matches!(ptr("/b/-").remove(&doc), Err(PointerError::PathNotFound(_))));
    }

    #[test]
    fn replace_rules() {
        let doc = json(r#"{"a": {"b": [0]}}"#).unwrap();
        assert_eq!(
            ptr("/a/b/0").replace(&doc, Value::from(9)).unwrap(),
            json(r#"{"a": {"b": [9]}}"#).unwrap()
        );
        assert_eq!(ptr("").replace(&doc, Value::Null).unwrap(), Value::Null);
        assert!(matches!(
            ptr("/a/c").replace(&doc, Value::Null),
            Err(PointerError::PathNotFound(_))
        ));
        assert!(matches!(
            ptr("/a/b/1").replace(&doc, Value::Null),
            Err(PointerError::PathNotFound(_))
        ));
    }

    #[test]
    fn edits_share_untouched_subtrees() {
        let doc = json(r#"{"left": {"x": [1, 2]}, "right": [3, 4]}"#).unwrap();
        let out = ptr("/left/y").add(&doc, Value::True).unwrap();
        match (doc.get("right"), out.get("right")) {
            (Some(Value::Array(before)), Some(Value::Array(after))) => assert!(Arc::ptr_eq(before, after)),
            other => panic!("unexpected {other:?}"),
        }
        let (Some(Value::Array(before)), Some(Value::Array(after))) = (
            doc.get("left").and_then(|l| l.get("x")),
            out.get("left").and_then(|l| l.get("x")),
        ) else {
            panic!("missing x");
        };
        assert!(Arc::ptr_eq(before, after));
        assert_eq!(doc, json(r#"{"left": {"x": [1, 2]}, "right": [3, 4]}"#).unwrap());
    }
}

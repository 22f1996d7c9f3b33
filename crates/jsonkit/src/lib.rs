//! Structural editing of JSON documents.
//!
//! - [`json_patch`]: JSON Patch (RFC 6902) operations, applied functionally
//!   over immutable [`Value`] trees, plus a fluent [`PatchBuilder`].
//! - [`json_patch_diff`]: computes a patch that turns one document into another.
//! - [`json_merge_patch`]: JSON Merge Patch (RFC 7396) apply and diff.
//! - [`json_cli`]: the logic behind the `json-*` binaries.
//!
//! The value model, the streaming parser/generator and JSON Pointer live in
//! their own crates and are re-exported here.
//!
//! # Example
//!
//! ```
//! use jsonkit::{from_str, JsonPatch};
//!
//! let doc = from_str(r#"{"a": [1, 2]}"#).unwrap();
//! let patch = JsonPatch::from_value(&from_str(r#"[
//!     {"op": "add", "path": "/a/-", "value": 3},
//!     {"op": "move", "from": "/a/0", "path": "/b"}
//! ]"#).unwrap()).unwrap();
//! let out = patch.apply(&doc).unwrap();
//! assert_eq!(out, from_str(r#"{"a": [2, 3], "b": 1}"#).unwrap());
//! ```

pub mod json_cli;
pub mod json_merge_patch;
pub mod json_patch;
pub mod json_patch_diff;

pub use jsonkit_pointer as pointer;
pub use jsonkit_stream as stream;
pub use jsonkit_value as value;

pub use jsonkit_pointer::{JsonPointer, PointerError};
pub use jsonkit_stream::{from_reader, from_str, to_string, to_string_pretty, to_writer};
pub use jsonkit_value::{Number, Value};

pub use json_merge_patch::JsonMergePatch;
pub use json_patch::{JsonPatch, Op, PatchBuilder, PatchError};

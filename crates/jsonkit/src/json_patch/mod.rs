//! JSON Patch (RFC 6902).
//!
//! # Operations
//!
//! `add`, `remove`, `replace`, `move`, `copy` and `test`. A patch is applied
//! operation by operation, each one producing a new immutable snapshot of the
//! document. The first failing operation aborts the whole patch and the input
//! document is returned to the caller untouched.

pub mod apply;
pub mod builder;
pub mod codec;
pub mod types;

pub use apply::{apply_op, apply_patch};
pub use builder::PatchBuilder;
pub use codec::{from_value, op_from_value, op_to_value, to_value};
pub use types::{JsonPatch, Op, PatchError};

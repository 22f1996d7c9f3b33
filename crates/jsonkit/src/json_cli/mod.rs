//! Core logic of the command-line tools.
//!
//! - `json-patch`       apply a JSON Patch to a document
//! - `json-pointer`     look up a JSON Pointer in a document
//! - `json-merge-patch` apply a JSON Merge Patch to a document
//! - `json-format`      re-emit a document, pretty or compact
//!
//! Every tool reads the document from stdin and prints the result on stdout.

use jsonkit_pointer::{JsonPointer, PointerError};
use jsonkit_stream::{from_str, to_string, to_string_pretty, GenerateError, ParseError};
use thiserror::Error;

use crate::json_merge_patch;
use crate::json_patch::{JsonPatch, PatchError};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Pointer(#[from] PointerError),
    #[error(transparent)]
    Patch(#[from] PatchError),
}

// ── json-patch ────────────────────────────────────────────────────────────

/// Applies a JSON Patch (RFC 6902) to a document.
///
/// Returns the patched document as pretty-printed JSON.
pub fn apply_json_patch(doc_json: &str, patch_json: &str) -> Result<String, CliError> {
    let doc = from_str(doc_json)?;
    let patch = JsonPatch::from_value(&from_str(patch_json)?)?;
    let result = patch.apply(&doc)?;
    Ok(to_string_pretty(&result)?)
}

// ── json-pointer ──────────────────────────────────────────────────────────

/// Looks up `pointer` in the document and returns the value found there.
pub fn lookup_pointer(doc_json: &str, pointer: &str) -> Result<String, CliError> {
    let doc = from_str(doc_json)?;
    let pointer: JsonPointer = pointer.parse()?;
    let value = pointer.get_value(&doc)?;
    Ok(to_string_pretty(value)?)
}

// ── json-merge-patch ──────────────────────────────────────────────────────

pub fn apply_merge_patch(doc_json: &str, patch_json: &str) -> Result<String, CliError> {
    let doc = from_str(doc_json)?;
    let patch = from_str(patch_json)?;
    Ok(to_string_pretty(&json_merge_patch::apply(&doc, &patch))?)
}

// ── json-format ───────────────────────────────────────────────────────────

pub fn format_json(doc_json: &str, pretty: bool) -> Result<String, CliError> {
    let doc = from_str(doc_json)?;
    let out = if pretty {
        to_string_pretty(&doc)?
    } else {
        to_string(&doc)?
    };
    Ok(out)
}

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use jsonkit::Value;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub suite: Vec<Suite>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Suite {
    pub name: String,
    pub file: String,
    pub kind: SuiteKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuiteKind {
    JsonPatch,
    MergePatch,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatchCase {
    pub comment: String,
    pub doc: serde_json::Value,
    pub patch: serde_json::Value,
    #[serde(default)]
    pub expected: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeCase {
    pub target: serde_json::Value,
    pub patch: serde_json::Value,
    pub result: serde_json::Value,
}

pub fn load_manifest() -> Manifest {
    let path = fixtures_dir().join("manifest.toml");
    let text = fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {:?}: {e}", path));
    toml::from_str(&text).unwrap_or_else(|e| panic!("failed to parse {:?}: {e}", path))
}

pub fn load_cases<T: DeserializeOwned>(suite: &Suite) -> Vec<T> {
    let path = fixtures_dir().join(&suite.file);
    let text = fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {:?}: {e}", path));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("failed to parse {:?}: {e}", path))
}

pub fn value(raw: &serde_json::Value) -> Value {
    Value::from(raw)
}

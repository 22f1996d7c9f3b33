use jsonkit::json_patch_diff::diff;
use jsonkit::{from_str, to_string, JsonMergePatch, JsonPatch, Op, PatchBuilder, Value};

fn json(text: &str) -> Value {
    from_str(text).unwrap()
}

#[test]
fn builder_patch_survives_wire_round_trip() {
    let mut builder = PatchBuilder::new();
    builder
        .add("/tags/-", "new")
        .unwrap()
        .replace("/title", "Hello")
        .unwrap()
        .copy("/title", "/heading")
        .unwrap()
        .move_value("/draft", "/meta/draft")
        .unwrap()
        .test("/meta/draft", false)
        .unwrap()
        .remove("/tags/0")
        .unwrap();
    let patch = builder.build();

    let wire = to_string(&patch.to_value()).unwrap();
    let decoded = JsonPatch::from_value(&json(&wire)).unwrap();
    assert_eq!(decoded, patch);

    let doc = json(r#"{"title": "Hi", "tags": ["old"], "draft": false, "meta": {}}"#);
    let out = decoded.apply(&doc).unwrap();
    assert_eq!(
        out,
        json(r#"{"title": "Hello", "tags": ["new"], "meta": {"draft": false}, "heading": "Hello"}"#)
    );
}

#[test]
fn diff_of_realistic_documents() {
    let source = json(
        r#"{"id": 7, "name": "widget", "parts": [{"sku": "a", "qty": 1}, {"sku": "b", "qty": 2}],
            "price": 10.00, "legacy": true}"#,
    );
    let target = json(
        r#"{"id": 7, "name": "widget", "parts": [{"sku": "a", "qty": 3}, {"sku": "b", "qty": 2}, {"sku": "c", "qty": 1}],
            "price": 10, "tags": ["sale"]}"#,
    );
    let patch = diff(&source, &target);
    assert_eq!(patch.apply(&source).unwrap(), target);

    let paths: Vec<String> = patch.ops().iter().map(|op| format!("{} {}", op.name(), op.path())).collect();
    assert_eq!(paths, ["replace /parts/0/qty", "add /parts/2", "remove /legacy", "add /tags"]);
}

#[test]
fn merge_patch_and_json_patch_agree() {
    let source = json(r#"{"a": {"b": 1, "c": 2}, "d": [1, 2]}"#);
    let target = json(r#"{"a": {"b": 1, "e": 3}, "d": [2]}"#);
    let merge = JsonMergePatch::diff(&source, &target);
    let patch = diff(&source, &target);
    assert_eq!(merge.apply(&source), patch.apply(&source).unwrap());
    assert!(patch.ops().iter().all(|op| !matches!(op, Op::Move { .. } | Op::Copy { .. })));
}

#[test]
fn large_decimal_survives_patch() {
    let doc = json(r#"{"n": 0}"#);
    let patch = JsonPatch::from_value(&json(
        r#"[{"op": "replace", "path": "/n", "value": 100000000000000000000.50}]"#,
    ))
    .unwrap();
    let out = patch.apply(&doc).unwrap();
    assert_eq!(to_string(&out).unwrap(), r#"{"n":100000000000000000000.50}"#);
}

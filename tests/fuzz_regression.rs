//! Regression tests for inputs found while fuzzing the extractor

use k8s_image_lister::extract::{ParseResult, extract_from_text};
use k8s_image_lister::file_types::ManifestFormat;
use std::panic::AssertUnwindSafe;

fn validate_result(result: &ParseResult, label: &str) {
    for r in &result.references {
        assert!(!r.image.is_empty(), "{label}: empty image");
        assert_eq!(r.image, r.image.trim(), "{label}: untrimmed image");
        assert!(!r.resource_kind.is_empty(), "{label}: empty kind");
    }
    assert!(
        result.errors.len() <= 1,
        "{}: {} errors for a single source",
        label,
        result.errors.len()
    );
    if !result.errors.is_empty() {
        assert!(result.references.is_empty(), "{label}: partial output");
    }
}

fn run(content: &str, format: ManifestFormat, label: &str) {
    let result = std::panic::catch_unwind(AssertUnwindSafe(|| extract_from_text(content, format)));

    match result {
        Ok(result) => validate_result(&result, label),
        Err(_) => panic!("{label}: extractor should not panic"),
    }
}

#[test]
fn test_yaml_alias_cycle_like_input() {
    let content = r#"
base: &base
  containers:
    - image: nginx
kind: Pod
spec: *base
"#;
    run(content, ManifestFormat::Yaml, "alias");
    let result = extract_from_text(content, ManifestFormat::Yaml);
    assert_eq!(result.references.len(), 1);
}

#[test]
fn test_yaml_undefined_alias() {
    run("kind: Pod\nspec: *missing\n", ManifestFormat::Yaml, "undefined alias");
}

#[test]
fn test_yaml_non_string_keys() {
    let content = r#"
? [complex, key]
: value
1: one
kind: Pod
spec:
  containers:
    - image: redis
      3.5: float-key
"#;
    run(content, ManifestFormat::Yaml, "non-string keys");
}

#[test]
fn test_yaml_custom_tags() {
    let content = r#"
kind: !Ref Pod
metadata: !Sub
  name: tagged
spec:
  containers: !List
    - image: !Image nginx
"#;
    run(content, ManifestFormat::Yaml, "custom tags");
}

#[test]
fn test_deeply_nested_json() {
    let depth = 200;
    let content = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    run(&content, ManifestFormat::Json, "nested arrays");
}

#[test]
fn test_json_with_unicode_images() {
    let content = r#"{"kind":"Pod","metadata":{"name":"ünïcode"},"spec":{"containers":[{"name":"ñ","image":"\u00a0registry/ímage:1\u2003"}]}}"#;
    run(content, ManifestFormat::Json, "unicode");
}

#[test]
fn test_garbage_input() {
    for content in ["\0\0\0", "---\n:\n- - -\n", "{{{{", "\"unterminated", "- - - - -"] {
        run(content, ManifestFormat::Yaml, "garbage yaml");
        run(content, ManifestFormat::Json, "garbage json");
    }
}

#[test]
fn test_spec_is_a_list() {
    run(
        "kind: Pod\nspec:\n  - containers:\n      - image: nginx\n",
        ManifestFormat::Yaml,
        "spec list",
    );
}

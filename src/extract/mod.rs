//! Image extraction engine
//!
//! Drives decoding, context inference, spec discovery and image extraction
//! over a batch of sources and assembles a [`ParseResult`].

use serde::{Deserialize, Serialize};

use crate::file_types::ManifestFormat;
use crate::parsers::decode_documents;
use crate::sources::{self, FileHandle, SourceBatch, SourceEntry};

pub mod context;
pub mod images;
pub mod locator;

pub use context::ResourceContext;
pub use images::extract_images;
pub use locator::{SpecCandidate, SpecPath, locate_specs};

/// Which container list an image was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerType {
    Container,
    InitContainer,
}

impl ContainerType {
    /// Field holding this list in a pod spec
    pub fn field_name(self) -> &'static str {
        match self {
            ContainerType::Container => "containers",
            ContainerType::InitContainer => "initContainers",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContainerType::Container => "container",
            ContainerType::InitContainer => "initContainer",
        }
    }
}

/// One extracted image with its attribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    /// Image string, trimmed and never empty
    pub image: String,
    pub resource_kind: String,
    /// Resource name, or `<resource> / <container>`
    pub resource_name: String,
    pub namespace: String,
    pub source_file: String,
    pub container_type: ContainerType,
}

/// A source that could not be read or decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub file: String,
    pub message: String,
}

/// Output of one extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub references: Vec<ImageReference>,
    pub errors: Vec<ParseError>,
    pub file_count: usize,
    pub text_entry_count: usize,
}

/// Extract images from every source of a batch, in order.
///
/// A source that fails to read or decode contributes one [`ParseError`] and
/// no references; the remaining sources are processed normally.
pub fn extract_from_sources(batch: SourceBatch) -> ParseResult {
    let mut references = Vec::new();
    let mut errors = Vec::new();

    for entry in batch.entries {
        let source = match entry {
            SourceEntry::Loaded(source) => source,
            SourceEntry::Unreadable { name, error } => {
                errors.push(ParseError {
                    file: name,
                    message: error.to_string(),
                });
                continue;
            }
        };

        let documents = match decode_documents(&source.text, &source.ext) {
            Ok(documents) => documents,
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", source.name, e);
                errors.push(ParseError {
                    file: source.name,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let before = references.len();
        for doc in documents.iter().filter(|doc| doc.is_mapping()) {
            let context = ResourceContext::from_document(doc, &source.name);
            references.extend(extract_images(doc, &source.name, &context));
        }

        tracing::debug!(
            "{}: {} documents, {} images",
            source.name,
            documents.len(),
            references.len() - before
        );
    }

    tracing::info!(
        "Extracted {} image references ({} errors)",
        references.len(),
        errors.len()
    );

    ParseResult {
        references,
        errors,
        file_count: batch.file_count,
        text_entry_count: batch.text_entry_count,
    }
}

/// Extract images from a single pasted text blob.
pub fn extract_from_text(content: &str, format: ManifestFormat) -> ParseResult {
    extract_from_sources(sources::from_text(content, format))
}

/// Read the given files in order and extract images from them.
pub async fn extract_from_files<F: FileHandle>(files: &[F]) -> ParseResult {
    extract_from_sources(sources::from_files(files).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::Source;

    fn batch(sources: Vec<Source>) -> SourceBatch {
        SourceBatch {
            file_count: sources.len(),
            entries: sources.into_iter().map(SourceEntry::Loaded).collect(),
            text_entry_count: 0,
        }
    }

    #[test]
    fn test_scenario_json_array_pod() {
        let result = extract_from_text(
            r#"[{"kind":"Pod","metadata":{"name":"demo"},"spec":{"containers":[{"name":"main","image":"nginx:1.25"}]}}]"#,
            ManifestFormat::Json,
        );

        assert!(result.errors.is_empty());
        assert_eq!(
            result.references,
            vec![ImageReference {
                image: "nginx:1.25".to_string(),
                resource_kind: "Pod".to_string(),
                resource_name: "demo / main".to_string(),
                namespace: "default".to_string(),
                source_file: "manual-input.json".to_string(),
                container_type: ContainerType::Container,
            }]
        );
        assert_eq!(result.file_count, 0);
        assert_eq!(result.text_entry_count, 1);
    }

    #[test]
    fn test_scenario_two_deployments() {
        let content = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: api
spec:
  template:
    spec:
      containers:
        - name: api
          image: registry.example.com/api:1.4.2
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: worker
  namespace: jobs
spec:
  template:
    spec:
      containers:
        - name: worker
          image: registry.example.com/worker:1.4.2
"#;
        let result = extract_from_text(content, ManifestFormat::Yaml);
        assert!(result.errors.is_empty());
        assert_eq!(result.references.len(), 2);
        assert_eq!(result.references[0].image, "registry.example.com/api:1.4.2");
        assert_eq!(result.references[0].resource_name, "api");
        assert_eq!(result.references[1].image, "registry.example.com/worker:1.4.2");
        assert_eq!(result.references[1].namespace, "jobs");
    }

    #[test]
    fn test_scenario_malformed_pasted_yaml() {
        let content = "kind: Pod\nspec:\n  containers:\n    - image: nginx\n   name: bad\n";
        let result = extract_from_text(content, ManifestFormat::Yaml);
        assert!(result.references.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].file, "manual-input.yaml");
        assert!(!result.errors[0].message.is_empty());
    }

    #[test]
    fn test_non_object_documents_are_skipped() {
        let content = "---\n- a\n- b\n---\njust text\n---\n42\n---\nkind: Pod\nspec:\n  containers:\n    - image: nginx\n";
        let result = extract_from_text(content, ManifestFormat::Yaml);
        assert!(result.errors.is_empty());
        assert_eq!(result.references.len(), 1);
    }

    #[test]
    fn test_failed_source_is_isolated() {
        let good = "kind: Pod\nspec:\n  containers:\n    - image: a:1\n";
        let result = extract_from_sources(batch(vec![
            Source::new("one.yaml", good),
            Source::new("broken.json", "{not json"),
            Source::new("two.yaml", good.replace("a:1", "b:1")),
        ]));

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].file, "broken.json");
        let images: Vec<&str> = result.references.iter().map(|r| r.image.as_str()).collect();
        assert_eq!(images, vec!["a:1", "b:1"]);
        assert_eq!(result.file_count, 3);
    }

    #[test]
    fn test_unreadable_source_becomes_error() {
        let result = extract_from_sources(SourceBatch {
            entries: vec![SourceEntry::Unreadable {
                name: "gone.yaml".to_string(),
                error: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file").into(),
            }],
            file_count: 1,
            text_entry_count: 0,
        });

        assert_eq!(
            result.errors,
            vec![ParseError {
                file: "gone.yaml".to_string(),
                message: "no such file".to_string(),
            }]
        );
    }

    #[test]
    fn test_kind_fallback_uses_source_name() {
        let result = extract_from_sources(batch(vec![Source::new(
            "foo-deployment.yaml",
            "spec:\n  containers:\n    - image: nginx\n",
        )]));
        assert_eq!(result.references[0].resource_kind, "Foo");
        assert_eq!(result.references[0].resource_name, "unknown");
    }

    #[test]
    fn test_idempotent() {
        let content = r#"{"kind":"Pod","spec":{"containers":[{"image":"a"}],"initContainers":[{"image":"b"}]}}"#;
        let first = extract_from_text(content, ManifestFormat::Json);
        let second = extract_from_text(content, ManifestFormat::Json);
        assert_eq!(first, second);
    }

    #[test]
    fn test_serialized_field_names() {
        let result = extract_from_text(
            r#"{"kind":"Pod","spec":{"initContainers":[{"image":"busybox"}]}}"#,
            ManifestFormat::Json,
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["fileCount"], 0);
        assert_eq!(value["textEntryCount"], 1);
        let reference = &value["references"][0];
        assert_eq!(reference["containerType"], "initContainer");
        assert_eq!(reference["resourceKind"], "Pod");
        assert_eq!(reference["resourceName"], "unknown");
        assert_eq!(reference["sourceFile"], "manual-input.json");
    }

    #[test]
    fn test_empty_text() {
        let result = extract_from_text("", ManifestFormat::Yaml);
        assert!(result.references.is_empty());
        assert!(result.errors.is_empty());
        assert_eq!(result.text_entry_count, 1);
    }

    #[test]
    fn test_container_from_merge_key() {
        let content = r#"
kind: Deployment
metadata:
  name: web
base: &base
  name: app
  image: nginx:1.25
spec:
  template:
    spec:
      containers:
        - <<: *base
"#;
        let result = extract_from_text(content, ManifestFormat::Yaml);
        assert!(result.errors.is_empty());
        assert_eq!(result.references.len(), 1);
        assert_eq!(result.references[0].image, "nginx:1.25");
        assert_eq!(result.references[0].resource_name, "web / app");
    }

    #[test]
    fn test_json_with_repeated_key() {
        let result = extract_from_text(
            r#"{"kind":"Pod","kind":"Pod","spec":{"containers":[{"image":"nginx"}]}}"#,
            ManifestFormat::Json,
        );
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(result.references.len(), 1);
        assert_eq!(result.references[0].image, "nginx");
        assert_eq!(result.references[0].resource_kind, "Pod");
    }
}

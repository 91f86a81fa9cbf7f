//! Resource context inference
//!
//! Every image is attributed to the resource it was found in. Manifests in
//! the wild are often incomplete, so each field falls back to a default
//! instead of failing.

use crate::parsers::Document;

const DEFAULT_NAME: &str = "unknown";
const DEFAULT_NAMESPACE: &str = "default";
const DEFAULT_KIND: &str = "Resource";

/// Kind, name and namespace of the resource a document describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceContext {
    pub kind: String,
    pub name: String,
    pub namespace: String,
}

impl ResourceContext {
    /// Infer the context of `doc`, read from the source called `source_name`.
    pub fn from_document(doc: &Document, source_name: &str) -> Self {
        let metadata = doc.get("metadata");

        let kind = match doc.get("kind").and_then(Document::as_str) {
            Some(kind) if !kind.is_empty() => kind.to_string(),
            _ => kind_from_file_name(source_name),
        };

        let name = metadata
            .and_then(|m| m.get("name"))
            .and_then(Document::as_str)
            .unwrap_or(DEFAULT_NAME)
            .to_string();

        let namespace = metadata
            .and_then(|m| m.get("namespace"))
            .and_then(Document::as_str)
            .unwrap_or(DEFAULT_NAMESPACE)
            .to_string();

        Self {
            kind,
            name,
            namespace,
        }
    }
}

/// Guess a kind from a file name: `foo-deployment.yaml` gives `Foo`.
///
/// Only the text before the first `-` of the last path segment is used, so
/// a name without a dash keeps its extension (`pod.yaml` gives `Pod.yaml`).
pub fn kind_from_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let hint = base.split('-').next().unwrap_or_default();
    capitalize(hint)
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => DEFAULT_KIND.to_string(),
    }
}

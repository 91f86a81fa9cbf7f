//! Decoder for JSON manifests

use super::{Document, DocumentDecoder, SourceError};

/// Decoder for `.json` sources.
///
/// A top-level array is a list of documents (one per element), which is
/// how `kubectl get -o json` style dumps are usually pasted.
#[derive(Debug, Default)]
pub struct JsonDecoder;

impl JsonDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentDecoder for JsonDecoder {
    fn decode(&self, content: &str) -> Result<Vec<Document>, SourceError> {
        // Repeated keys: the last one wins
        let value: serde_json::Value = serde_json::from_str(content)?;
        let value: Document = serde_yaml::to_value(value)?;

        Ok(match value {
            Document::Sequence(items) => items,
            other => vec![other],
        })
    }
}

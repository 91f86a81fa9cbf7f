//! Decoder for YAML manifests

use serde::Deserialize;

use super::{Document, DocumentDecoder, SourceError};

/// Decoder for YAML sources, including `---` separated multi-document
/// streams.
#[derive(Debug, Default)]
pub struct YamlDecoder;

impl YamlDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentDecoder for YamlDecoder {
    fn decode(&self, content: &str) -> Result<Vec<Document>, SourceError> {
        let mut documents = Vec::new();

        // A syntax error anywhere fails the whole stream
        for de in serde_yaml::Deserializer::from_str(content) {
            let mut document = Document::deserialize(de)?;
            // `<<: *base` keys are folded into their mapping
            document.apply_merge()?;
            documents.push(document);
        }

        Ok(documents)
    }
}

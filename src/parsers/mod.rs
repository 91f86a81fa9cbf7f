//! Decoders for manifest sources (YAML, JSON)

use thiserror::Error;

pub use serde_yaml::Value as Document;

/// Why a source produced no documents.
///
/// The message of each variant is the underlying error's own message, which
/// is what ends up in [`crate::extract::ParseError::message`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0}")]
    Read(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Trait for decoding a source's text into untyped documents
pub trait DocumentDecoder: Send + Sync {
    /// Decode the given text. Documents come back in encounter order and
    /// may be of any shape; filtering non-objects is the caller's job.
    fn decode(&self, content: &str) -> Result<Vec<Document>, SourceError>;
}

/// Pick the decoder for a source extension. Anything other than `.json`
/// is treated as YAML.
pub fn decoder_for(ext: &str) -> &'static dyn DocumentDecoder {
    if ext == ".json" {
        &json::JsonDecoder
    } else {
        &yaml::YamlDecoder
    }
}

/// Decode a source's text according to its extension.
pub fn decode_documents(content: &str, ext: &str) -> Result<Vec<Document>, SourceError> {
    decoder_for(ext).decode(content)
}

pub mod json;
pub mod yaml;

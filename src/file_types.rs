//! Manifest file type detection
//!
//! This module decides which files on disk look like Kubernetes manifests
//! and which decoder their content should go through.

use std::path::Path;

/// Supported manifest encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// YAML documents (`.yaml`, `.yml`), possibly `---` separated
    Yaml,
    /// A single JSON value (`.json`)
    Json,
}

impl ManifestFormat {
    /// Detect the manifest format from a file path.
    ///
    /// Matching is case-insensitive on the extension. Returns `None` for
    /// anything that is not `.yaml`, `.yml` or `.json`.
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(ManifestFormat::Yaml),
            "json" => Some(ManifestFormat::Json),
            _ => None,
        }
    }

    /// Extension (with the leading dot) used for synthetic sources.
    pub fn extension(self) -> &'static str {
        match self {
            ManifestFormat::Yaml => ".yaml",
            ManifestFormat::Json => ".json",
        }
    }

    /// Name given to pasted text of this format.
    pub fn manual_input_name(self) -> &'static str {
        match self {
            ManifestFormat::Yaml => "manual-input.yaml",
            ManifestFormat::Json => "manual-input.json",
        }
    }
}

//! Source ingestion
//!
//! Normalizes files and pasted text into an ordered list of named sources.
//! Nothing in here looks at the content; decoding happens in
//! [`crate::parsers`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use crate::file_types::ManifestFormat;
use crate::parsers::SourceError;

/// One unit of input before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Name used for display and attribution
    pub name: String,
    /// Raw text content
    pub text: String,
    /// Lowercased extension including the dot (e.g. ".yaml"), or empty
    pub ext: String,
}

impl Source {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let name = name.into();
        let ext = extension_of(&name);
        Self {
            name,
            text: text.into(),
            ext,
        }
    }
}

/// A source in a batch. Files that could not be read keep their slot so
/// the failure is reported in input order.
#[derive(Debug)]
pub enum SourceEntry {
    Loaded(Source),
    Unreadable { name: String, error: SourceError },
}

impl SourceEntry {
    pub fn name(&self) -> &str {
        match self {
            SourceEntry::Loaded(source) => &source.name,
            SourceEntry::Unreadable { name, .. } => name,
        }
    }
}

/// Ordered sources plus provenance counters.
#[derive(Debug, Default)]
pub struct SourceBatch {
    pub entries: Vec<SourceEntry>,
    pub file_count: usize,
    pub text_entry_count: usize,
}

/// File read collaborator.
#[async_trait]
pub trait FileHandle: Send + Sync {
    /// Name recorded on the resulting source
    fn name(&self) -> String;

    /// Read the full text content
    async fn read_text(&self) -> std::io::Result<String>;
}

/// A manifest file on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileHandle for LocalFile {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_text(&self) -> std::io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }
}

/// Manifest files under `dir`, sorted by path.
///
/// Only files with a recognized manifest extension are kept; unreadable
/// directory entries are logged and skipped.
pub fn collect_manifest_files(dir: &Path, recursive: bool, follow_links: bool) -> Vec<LocalFile> {
    let mut walker = WalkDir::new(dir)
        .follow_links(follow_links)
        .sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| ManifestFormat::detect(entry.path()).is_some())
        .map(|entry| LocalFile::new(entry.into_path()))
        .collect()
}

/// Read every file, in order, into a batch.
///
/// Reads are awaited one after the other so the batch order always matches
/// the input order.
pub async fn from_files<F: FileHandle>(files: &[F]) -> SourceBatch {
    let mut entries = Vec::with_capacity(files.len());

    for file in files {
        let name = file.name();
        match file.read_text().await {
            Ok(text) => entries.push(SourceEntry::Loaded(Source::new(name, text))),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", name, e);
                entries.push(SourceEntry::Unreadable {
                    name,
                    error: SourceError::Read(e),
                });
            }
        }
    }

    SourceBatch {
        entries,
        file_count: files.len(),
        text_entry_count: 0,
    }
}

/// Wrap pasted text as a single source of the declared format.
pub fn from_text(content: &str, format: ManifestFormat) -> SourceBatch {
    let source = Source {
        name: format.manual_input_name().to_string(),
        text: content.to_string(),
        ext: format.extension().to_string(),
    };

    SourceBatch {
        entries: vec![SourceEntry::Loaded(source)],
        file_count: 0,
        text_entry_count: 1,
    }
}

/// Lowercased extension of the final path segment, including the dot.
fn extension_of(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rfind('.') {
        Some(idx) => base[idx..].to_lowercase(),
        None => String::new(),
    }
}

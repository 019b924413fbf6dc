// ABOUTME: Source enumerators that yield (relative path, content) pairs.
// ABOUTME: Reads either a packaged tar bundle or a plain repository directory tree.

mod bundle;
mod error;
mod tree;

pub use bundle::read_bundle;
pub use error::SourceError;
pub use tree::walk_tree;

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// One file read from a source, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Path relative to the source root, `/`-separated.
    pub path: String,
    pub content: Vec<u8>,
}

impl SourceEntry {
    pub fn new(path: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }
}

/// Where the artifacts of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A tar archive, optionally gzip-compressed.
    Bundle(PathBuf),
    /// A checked-out repository directory.
    Tree(PathBuf),
}

impl Source {
    /// Check that the source exists. Fails the whole run otherwise.
    pub fn resolve(self) -> Result<Self> {
        let exists = match &self {
            Source::Bundle(path) => path.is_file(),
            Source::Tree(path) => path.is_dir(),
        };
        if exists {
            Ok(self)
        } else {
            Err(Error::SourceNotFound(self.path().to_path_buf()))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Source::Bundle(path) | Source::Tree(path) => path,
        }
    }

    /// Short label for progress output.
    pub fn label(&self) -> &'static str {
        match self {
            Source::Bundle(_) => "bundle",
            Source::Tree(_) => "git repository",
        }
    }

    /// Read every candidate entry in enumeration order.
    pub fn entries(&self) -> std::result::Result<Vec<SourceEntry>, SourceError> {
        match self {
            Source::Bundle(path) => read_bundle(path),
            Source::Tree(path) => walk_tree(path),
        }
    }
}

/// Normalize an archive or filesystem path to the `/`-separated relative form.
pub(crate) fn normalize_path(raw: &str) -> String {
    let unified = raw.replace('\\', "/");
    let mut trimmed = unified.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.trim_start_matches('/').to_string()
}

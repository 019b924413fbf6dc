// ABOUTME: Source enumeration error types with SNAFU pattern.
// ABOUTME: Every variant carries the path that failed to read.

use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SourceError {
    #[snafu(display("failed to open bundle {}: {source}", path.display()))]
    OpenBundle {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to read bundle {}: {source}", path.display()))]
    ReadBundle {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to list directory {}: {source}", path.display()))]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("path is not valid UTF-8: {}", path.display()))]
    NonUtf8Path { path: PathBuf },
}

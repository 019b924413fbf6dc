// ABOUTME: Application-wide error types for promoter.
// ABOUTME: Run-level failures that abort a deployment before or outside the per-artifact loop.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::MissingEnvVar;
use crate::publish::PublishError;
use crate::source::SourceError;
use crate::types::WorkspaceNameError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("no source given: pass --bundle or --git-repo")]
    NoSource,

    #[error("source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("invalid workspace name: {0}")]
    InvalidWorkspace(#[from] WorkspaceNameError),

    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVar),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("workspace API error: {0}")]
    Publish(#[from] PublishError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

// ABOUTME: Error types for per-artifact deployment.
// ABOUTME: A DeployError names the artifact and wraps the cause that stopped its dispatch.

use crate::publish::PublishError;
use crate::substitution::SubstitutionError;
use crate::types::ArtifactKind;

/// Failure to deploy a single artifact. Never aborts the run.
#[derive(Debug, thiserror::Error)]
#[error("failed to deploy {kind} {name}: {cause}")]
pub struct DeployError {
    pub kind: ArtifactKind,
    pub name: String,
    pub cause: DispatchCause,
}

impl DeployError {
    pub fn new(
        kind: ArtifactKind,
        name: impl Into<String>,
        cause: impl Into<DispatchCause>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            cause: cause.into(),
        }
    }
}

/// Why a dispatch failed.
#[derive(Debug, thiserror::Error)]
pub enum DispatchCause {
    /// The remote service rejected or never received the artifact.
    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),

    /// Pipeline bodies must be text.
    #[error("pipeline body is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    /// A substitution value could not be resolved.
    #[error("parameter substitution failed: {0}")]
    Substitution(#[from] SubstitutionError),

    /// Dataflows are published as structured definitions only.
    #[error("dataflow definition is not valid JSON: {0}")]
    InvalidDataflow(#[source] serde_json::Error),

    /// Unrecognized files are never dispatched.
    #[error("{0} artifacts are not deployable")]
    NotDeployable(ArtifactKind),
}

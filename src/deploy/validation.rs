// ABOUTME: Validate-only pass over a source: classify and prepare, never publish.
// ABOUTME: Reports which artifacts would deploy and which would fail preparation.

use serde::Serialize;

use super::dispatcher::prepare;
use crate::source::SourceEntry;
use crate::substitution::EnvironmentConfig;
use crate::types::{Artifact, ArtifactKind, Environment, WorkspaceName};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedArtifact {
    pub path: String,
    pub name: String,
    pub kind: ArtifactKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub workspace: String,
    pub environment: Environment,
    pub artifacts: Vec<ValidatedArtifact>,
    /// Entries that classified as unrecognized.
    pub skipped: usize,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.artifacts.iter().all(|a| a.error.is_none())
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_valid() { 0 } else { 1 }
    }
}

/// Classify each entry and run its kind-specific preparation.
pub fn validate_entries<C>(
    workspace: &WorkspaceName,
    entries: Vec<SourceEntry>,
    parameters: &C,
) -> ValidationReport
where
    C: EnvironmentConfig + ?Sized,
{
    let environment = workspace.environment();
    let mut artifacts = Vec::new();
    let mut skipped = 0;

    for entry in entries {
        let Some(artifact) = Artifact::admit(entry.path, entry.content) else {
            skipped += 1;
            continue;
        };

        let error = prepare(&artifact, parameters, environment)
            .err()
            .map(|e| e.cause.to_string());

        artifacts.push(ValidatedArtifact {
            path: artifact.path().to_string(),
            name: artifact.name().to_string(),
            kind: artifact.kind(),
            error,
        });
    }

    ValidationReport {
        workspace: workspace.to_string(),
        environment,
        artifacts,
        skipped,
    }
}

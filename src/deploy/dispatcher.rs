// ABOUTME: Per-kind dispatch of classified artifacts to the publisher.
// ABOUTME: Prepares each body (substitution, JSON parse) then calls the matching publish operation.

use serde_json::Value;
use tracing::warn;

use super::error::{DeployError, DispatchCause};
use super::ledger::Dispatched;
use crate::publish::Publisher;
use crate::substitution::{EnvironmentConfig, substitute};
use crate::types::{Artifact, ArtifactKind, Environment, WorkspaceId};

/// An artifact body ready to publish.
#[derive(Debug, Clone, PartialEq)]
pub enum Prepared<'a> {
    Notebook(&'a [u8]),
    Pipeline {
        body: String,
        /// Set when the body wasn't valid JSON and only text substitution applied.
        fallback: Option<String>,
    },
    Dataflow(Value),
    /// Spark job definitions have no publish operation yet; they are counted
    /// as deployed without contacting the service.
    SparkJobPlaceholder,
}

/// Run the kind-specific preparation for an artifact without publishing.
pub fn prepare<'a, C>(
    artifact: &'a Artifact,
    parameters: &C,
    env: Environment,
) -> Result<Prepared<'a>, DeployError>
where
    C: EnvironmentConfig + ?Sized,
{
    let fail = |cause: DispatchCause| DeployError::new(artifact.kind(), artifact.name(), cause);

    match artifact.kind() {
        ArtifactKind::Notebook => Ok(Prepared::Notebook(artifact.content())),
        ArtifactKind::Pipeline => {
            let text = std::str::from_utf8(artifact.content()).map_err(|e| fail(e.into()))?;
            let substituted = substitute(parameters, text, env).map_err(|e| fail(e.into()))?;
            Ok(Prepared::Pipeline {
                body: substituted.body,
                fallback: substituted.fallback,
            })
        }
        ArtifactKind::Dataflow => {
            let body = serde_json::from_slice(artifact.content())
                .map_err(|e| fail(DispatchCause::InvalidDataflow(e)))?;
            Ok(Prepared::Dataflow(body))
        }
        ArtifactKind::SparkJob => Ok(Prepared::SparkJobPlaceholder),
        ArtifactKind::Unrecognized => Err(fail(DispatchCause::NotDeployable(artifact.kind()))),
    }
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub dispatched: Dispatched,
    /// Pipeline JSON parse error that forced text-only substitution.
    pub substitution_fallback: Option<String>,
}

/// Routes artifacts to the publisher operation for their kind.
///
/// Performs no retries; a failed publish call is returned as-is.
pub struct Dispatcher<'a> {
    publisher: &'a dyn Publisher,
    parameters: &'a dyn EnvironmentConfig,
    environment: Environment,
    workspace: &'a WorkspaceId,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        publisher: &'a dyn Publisher,
        parameters: &'a dyn EnvironmentConfig,
        environment: Environment,
        workspace: &'a WorkspaceId,
    ) -> Self {
        Self {
            publisher,
            parameters,
            environment,
            workspace,
        }
    }

    pub async fn dispatch(&self, artifact: &Artifact) -> Result<DispatchReport, DeployError> {
        let fail = |cause: DispatchCause| DeployError::new(artifact.kind(), artifact.name(), cause);

        match prepare(artifact, self.parameters, self.environment)? {
            Prepared::Notebook(content) => {
                self.publisher
                    .publish_notebook(self.workspace, artifact.name(), content)
                    .await
                    .map_err(|e| fail(e.into()))?;
                Ok(published(None))
            }
            Prepared::Pipeline { body, fallback } => {
                if let Some(reason) = &fallback {
                    warn!(
                        pipeline = %artifact.name(),
                        %reason,
                        "publishing pipeline with text-only substitution"
                    );
                }
                self.publisher
                    .publish_pipeline(self.workspace, &body)
                    .await
                    .map_err(|e| fail(e.into()))?;
                Ok(published(fallback))
            }
            Prepared::Dataflow(body) => {
                self.publisher
                    .publish_dataflow(self.workspace, artifact.name(), &body)
                    .await
                    .map_err(|e| fail(e.into()))?;
                Ok(published(None))
            }
            Prepared::SparkJobPlaceholder => Ok(DispatchReport {
                dispatched: Dispatched::Placeholder,
                substitution_fallback: None,
            }),
        }
    }
}

fn published(substitution_fallback: Option<String>) -> DispatchReport {
    DispatchReport {
        dispatched: Dispatched::Published,
        substitution_fallback,
    }
}

// ABOUTME: Orchestrates one deployment run over the artifacts of a source.
// ABOUTME: Classify, reserve a record, dispatch, settle; then report or roll back on demand.

use tracing::{debug, info, warn};

use super::dispatcher::Dispatcher;
use super::ledger::{Dispatched, Ledger};
use super::mode::DeployMode;
use super::record::DeployRecord;
use super::report::DeploymentReport;
use super::rollback::{RollbackExecutor, RollbackResult};
use crate::diagnostics::{Diagnostics, Warning};
use crate::publish::Publisher;
use crate::source::SourceEntry;
use crate::substitution::EnvironmentConfig;
use crate::types::{Artifact, Environment, WorkspaceId, WorkspaceName};

/// Where a run deploys to and how.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub workspace: WorkspaceName,
    pub workspace_id: WorkspaceId,
    pub environment: Environment,
    pub mode: DeployMode,
}

impl RunContext {
    /// The environment is inferred from the workspace display name.
    pub fn new(workspace: WorkspaceName, workspace_id: WorkspaceId, mode: DeployMode) -> Self {
        Self {
            environment: workspace.environment(),
            workspace,
            workspace_id,
            mode,
        }
    }
}

/// A single deployment run. Artifacts are processed one at a time, in the
/// order they are given.
pub struct DeploymentRun<'a> {
    publisher: &'a dyn Publisher,
    parameters: &'a dyn EnvironmentConfig,
    context: RunContext,
    ledger: Ledger,
    diagnostics: Diagnostics,
}

impl<'a> DeploymentRun<'a> {
    pub fn new(
        publisher: &'a dyn Publisher,
        parameters: &'a dyn EnvironmentConfig,
        context: RunContext,
        rollback_enabled: bool,
    ) -> Self {
        Self {
            publisher,
            parameters,
            context,
            ledger: Ledger::new(rollback_enabled),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Classify and deploy one source entry.
    ///
    /// Returns the settled record, or `None` when the entry isn't a
    /// recognized artifact. A dispatch failure is counted, never returned.
    pub async fn deploy_entry(&mut self, entry: SourceEntry) -> Option<&DeployRecord> {
        let SourceEntry { path, content } = entry;
        let Some(artifact) = Artifact::admit(path.as_str(), content) else {
            debug!(%path, "skipping unrecognized file");
            return None;
        };

        let reservation = self.ledger.reserve(&artifact, &self.context.workspace_id);
        let dispatcher = Dispatcher::new(
            self.publisher,
            self.parameters,
            self.context.environment,
            &self.context.workspace_id,
        );

        match dispatcher.dispatch(&artifact).await {
            Ok(report) => {
                if let Some(reason) = report.substitution_fallback {
                    self.diagnostics.warn(Warning::substitution_fallback(format!(
                        "pipeline {} deployed with text-only substitution: {}",
                        artifact.name(),
                        reason
                    )));
                }
                if report.dispatched == Dispatched::Placeholder {
                    self.diagnostics.warn(Warning::placeholder(format!(
                        "spark job definition {} counted as deployed but not published",
                        artifact.name()
                    )));
                }
                info!(kind = %artifact.kind(), name = %artifact.name(), "deployed");
                Some(self.ledger.settle_success(reservation, report.dispatched))
            }
            Err(e) => {
                warn!(
                    kind = %artifact.kind(),
                    name = %artifact.name(),
                    error = %e.cause,
                    "deploy failed"
                );
                Some(self.ledger.settle_failure(reservation, &e))
            }
        }
    }

    /// Deploy every entry in order.
    pub async fn deploy_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = SourceEntry>,
    {
        for entry in entries {
            self.deploy_entry(entry).await;
        }
    }

    /// Current report. Has no side effects.
    pub fn report(&self) -> DeploymentReport {
        DeploymentReport::build(self.context.workspace.as_str(), self.context.mode, &self.ledger)
    }

    /// Reverse this run's dispatches, newest first.
    pub async fn rollback(&self) -> RollbackResult {
        RollbackExecutor::new(self.publisher)
            .rollback(&self.ledger)
            .await
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

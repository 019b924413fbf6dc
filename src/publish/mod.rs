// ABOUTME: Remote workspace publishing seam.
// ABOUTME: Publisher trait for per-kind publish, delete, and restore, plus an HTTP implementation.

mod error;
mod http;

pub use error::PublishError;
pub use http::{Endpoint, HttpPublisher};

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{ArtifactKind, WorkspaceId, WorkspaceName};

/// Operations the remote workspace service offers.
///
/// Retries and backoff belong to implementations; callers treat each call as
/// a single attempt that either returns or fails.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Look up the id of a workspace by display name.
    async fn resolve_workspace(&self, name: &WorkspaceName) -> Result<WorkspaceId, PublishError>;

    /// Create or replace a notebook.
    async fn publish_notebook(
        &self,
        workspace: &WorkspaceId,
        name: &str,
        content: &[u8],
    ) -> Result<(), PublishError>;

    /// Create or replace a pipeline from its (substituted) JSON text.
    async fn publish_pipeline(
        &self,
        workspace: &WorkspaceId,
        body: &str,
    ) -> Result<(), PublishError>;

    /// Create or replace a dataflow from its parsed definition.
    async fn publish_dataflow(
        &self,
        workspace: &WorkspaceId,
        name: &str,
        body: &Value,
    ) -> Result<(), PublishError>;

    /// Delete an item. Used to compensate a create.
    async fn delete_item(
        &self,
        workspace: &WorkspaceId,
        kind: ArtifactKind,
        name: &str,
    ) -> Result<(), PublishError>;

    /// Put back an item's previous definition. Used to compensate an update
    /// or delete.
    async fn restore_item(
        &self,
        workspace: &WorkspaceId,
        kind: ArtifactKind,
        name: &str,
        previous_state: &Value,
    ) -> Result<(), PublishError>;
}

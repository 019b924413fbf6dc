// ABOUTME: Deploy records kept for history and rollback.
// ABOUTME: One record per dispatch attempt, with operation, provenance, and outcome.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::types::{ArtifactKind, WorkspaceId};

/// What a dispatch did to the remote item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

/// How a dispatch attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordOutcome {
    /// Reserved, publish not yet settled.
    Pending,
    /// The publish call returned normally.
    Published,
    /// Counted as deployed without a publish call (spark job definitions).
    Placeholder,
    /// The dispatch failed; nothing took effect remotely.
    Failed,
}

impl RecordOutcome {
    /// Whether the attempt changed the remote workspace.
    pub fn took_effect(&self) -> bool {
        matches!(self, RecordOutcome::Published | RecordOutcome::Placeholder)
    }
}

/// One dispatch attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeployRecord {
    pub name: String,
    pub kind: ArtifactKind,
    pub operation: Operation,
    pub previous_state: Option<Value>,
    pub timestamp: DateTime<Utc>,
    pub workspace_id: WorkspaceId,
    pub outcome: RecordOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

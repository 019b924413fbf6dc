// ABOUTME: Rollback executor that replays the ledger newest-first.
// ABOUTME: Issues a compensating action per record and reports each outcome independently.

use serde::Serialize;
use tracing::{info, warn};

use super::ledger::Ledger;
use super::record::{DeployRecord, Operation};
use crate::publish::Publisher;
use crate::types::ArtifactKind;

/// Overall rollback outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RollbackStatus {
    /// Every record was visited. Individual actions may still have failed.
    RollbackCompleted,
    /// Rollback was turned off for the run.
    RollbackDisabled,
    /// The ledger has no records.
    NoHistory,
}

/// Outcome of compensating a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionStatus {
    Success,
    Failed,
    /// Nothing was captured before the update or delete, so nothing to restore.
    NoPreviousState,
    /// The dispatch failed, so there is nothing to compensate.
    NotApplied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollbackAction {
    pub name: String,
    pub kind: ArtifactKind,
    pub operation: Operation,
    pub status: ActionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollbackResult {
    pub status: RollbackStatus,
    pub actions: Vec<RollbackAction>,
}

impl RollbackResult {
    fn empty(status: RollbackStatus) -> Self {
        Self {
            status,
            actions: Vec::new(),
        }
    }

    /// Number of actions that ended in `Failed`.
    pub fn failed_actions(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| a.status == ActionStatus::Failed)
            .count()
    }
}

/// Reverses a run's dispatches through the publisher.
pub struct RollbackExecutor<'a> {
    publisher: &'a dyn Publisher,
}

impl<'a> RollbackExecutor<'a> {
    pub fn new(publisher: &'a dyn Publisher) -> Self {
        Self { publisher }
    }

    /// Compensate every record in the ledger, newest first.
    ///
    /// Per operation:
    /// 1. `Create` deletes the created item
    /// 2. `Update` restores the previous state, if one was captured
    /// 3. `Delete` recreates the item from the previous state, if one was captured
    ///
    /// A failing action is recorded and the remaining records are still
    /// processed. Records are read, never removed, so running this twice
    /// replays the same actions.
    pub async fn rollback(&self, ledger: &Ledger) -> RollbackResult {
        if !ledger.rollback_enabled() {
            info!("rollback disabled for this run");
            return RollbackResult::empty(RollbackStatus::RollbackDisabled);
        }

        if ledger.is_empty() {
            info!("no deployment history to roll back");
            return RollbackResult::empty(RollbackStatus::NoHistory);
        }

        let mut actions = Vec::with_capacity(ledger.records().len());
        for record in ledger.records().iter().rev() {
            actions.push(self.compensate(record).await);
        }

        RollbackResult {
            status: RollbackStatus::RollbackCompleted,
            actions,
        }
    }

    async fn compensate(&self, record: &DeployRecord) -> RollbackAction {
        let action = |status: ActionStatus, error: Option<String>| RollbackAction {
            name: record.name.clone(),
            kind: record.kind,
            operation: record.operation,
            status,
            error,
        };

        if !record.outcome.took_effect() {
            return action(ActionStatus::NotApplied, None);
        }

        let workspace = &record.workspace_id;
        let result = match (record.operation, &record.previous_state) {
            (Operation::Create, _) => {
                self.publisher
                    .delete_item(workspace, record.kind, &record.name)
                    .await
            }
            (Operation::Update | Operation::Delete, Some(previous)) => {
                self.publisher
                    .restore_item(workspace, record.kind, &record.name, previous)
                    .await
            }
            (Operation::Update | Operation::Delete, None) => {
                info!(name = %record.name, kind = %record.kind, "no previous state captured");
                return action(ActionStatus::NoPreviousState, None);
            }
        };

        match result {
            Ok(()) => {
                info!(
                    name = %record.name,
                    kind = %record.kind,
                    operation = ?record.operation,
                    "rolled back"
                );
                action(ActionStatus::Success, None)
            }
            Err(e) => {
                warn!(
                    name = %record.name,
                    kind = %record.kind,
                    error = %e,
                    "rollback action failed"
                );
                action(ActionStatus::Failed, Some(e.to_string()))
            }
        }
    }
}

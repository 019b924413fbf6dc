// ABOUTME: Per-run deployment ledger: statistics plus ordered dispatch records.
// ABOUTME: Records are reserved before a dispatch and settled exactly once afterwards.

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use super::error::DeployError;
use super::record::{DeployRecord, Operation, RecordOutcome};
use crate::types::{Artifact, KindCategory, WorkspaceId};

/// Deployed and failed counts for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounters {
    pub deployed: u64,
    pub failed: u64,
}

/// Counters for every artifact category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeploymentStats {
    pub notebooks: KindCounters,
    pub pipelines: KindCounters,
    pub dataflows: KindCounters,
    pub spark_jobs: KindCounters,
}

impl DeploymentStats {
    pub fn get(&self, category: KindCategory) -> &KindCounters {
        match category {
            KindCategory::Notebooks => &self.notebooks,
            KindCategory::Pipelines => &self.pipelines,
            KindCategory::Dataflows => &self.dataflows,
            KindCategory::SparkJobs => &self.spark_jobs,
        }
    }

    fn get_mut(&mut self, category: KindCategory) -> &mut KindCounters {
        match category {
            KindCategory::Notebooks => &mut self.notebooks,
            KindCategory::Pipelines => &mut self.pipelines,
            KindCategory::Dataflows => &mut self.dataflows,
            KindCategory::SparkJobs => &mut self.spark_jobs,
        }
    }

    pub fn record_success(&mut self, category: KindCategory) {
        self.get_mut(category).deployed += 1;
    }

    pub fn record_failure(&mut self, category: KindCategory) {
        self.get_mut(category).failed += 1;
    }

    pub fn total_deployed(&self) -> u64 {
        KindCategory::ALL.iter().map(|c| self.get(*c).deployed).sum()
    }

    pub fn total_failed(&self) -> u64 {
        KindCategory::ALL.iter().map(|c| self.get(*c).failed).sum()
    }
}

/// Claim on a pending record. Must be settled with the ledger that issued it.
///
/// Not `Clone`: settling consumes it, so a record can't be counted twice.
#[derive(Debug)]
#[must_use = "a reservation must be settled or its record stays pending"]
pub struct Reservation {
    index: usize,
    category: KindCategory,
}

/// How a successful dispatch was counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Published,
    /// Counted as deployed without publishing.
    Placeholder,
}

/// Statistics and dispatch history for one run.
#[derive(Debug, Clone)]
pub struct Ledger {
    stats: DeploymentStats,
    records: Vec<DeployRecord>,
    rollback_enabled: bool,
}

impl Ledger {
    pub fn new(rollback_enabled: bool) -> Self {
        Self {
            stats: DeploymentStats::default(),
            records: Vec::new(),
            rollback_enabled,
        }
    }

    /// Rebuild a ledger from previously recorded history.
    ///
    /// Statistics are recomputed from each record's outcome; pending records
    /// are kept but not counted.
    pub fn from_history(records: Vec<DeployRecord>, rollback_enabled: bool) -> Self {
        let mut stats = DeploymentStats::default();
        for record in &records {
            let Some(category) = record.kind.category() else {
                continue;
            };
            match record.outcome {
                RecordOutcome::Published | RecordOutcome::Placeholder => {
                    stats.record_success(category)
                }
                RecordOutcome::Failed => stats.record_failure(category),
                RecordOutcome::Pending => {}
            }
        }
        Self {
            stats,
            records,
            rollback_enabled,
        }
    }

    /// Append a pending record for an artifact about to be dispatched.
    ///
    /// No lookup of the existing remote item happens first, so the operation
    /// is always `Update` and no previous state is captured.
    pub fn reserve(&mut self, artifact: &Artifact, workspace: &WorkspaceId) -> Reservation {
        let record = DeployRecord {
            name: artifact.name().to_string(),
            kind: artifact.kind(),
            operation: Operation::Update,
            previous_state: None,
            timestamp: Utc::now(),
            workspace_id: workspace.clone(),
            outcome: RecordOutcome::Pending,
            error: None,
        };
        self.append_rollback_record(record);
        Reservation {
            index: self.records.len() - 1,
            category: artifact.category(),
        }
    }

    /// Settle a reservation as deployed.
    ///
    /// # Panics
    ///
    /// Panics if `reservation` was issued by a different ledger that had more
    /// records than this one.
    pub fn settle_success(
        &mut self,
        reservation: Reservation,
        dispatched: Dispatched,
    ) -> &DeployRecord {
        self.stats.record_success(reservation.category);
        let record = &mut self.records[reservation.index];
        record.outcome = match dispatched {
            Dispatched::Published => RecordOutcome::Published,
            Dispatched::Placeholder => RecordOutcome::Placeholder,
        };
        record
    }

    /// Settle a reservation as failed.
    ///
    /// # Panics
    ///
    /// Same condition as [`Ledger::settle_success`].
    pub fn settle_failure(
        &mut self,
        reservation: Reservation,
        error: &DeployError,
    ) -> &DeployRecord {
        self.stats.record_failure(reservation.category);
        let record = &mut self.records[reservation.index];
        record.outcome = RecordOutcome::Failed;
        record.error = Some(error.cause.to_string());
        record
    }

    fn append_rollback_record(&mut self, record: DeployRecord) {
        debug!(name = %record.name, kind = %record.kind, "recording dispatch attempt");
        self.records.push(record);
    }

    pub fn stats(&self) -> &DeploymentStats {
        &self.stats
    }

    /// Records in append order.
    pub fn records(&self) -> &[DeployRecord] {
        &self.records
    }

    pub fn rollback_enabled(&self) -> bool {
        self.rollback_enabled
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Copy of the current statistics and records.
    pub fn snapshot(&self) -> (DeploymentStats, Vec<DeployRecord>) {
        (self.stats.clone(), self.records.clone())
    }
}

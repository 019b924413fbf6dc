// ABOUTME: Deployment report derived from a ledger snapshot.
// ABOUTME: Computes totals, success rate, and the overall run status.

use serde::{Serialize, Serializer};
use std::fmt;

use super::ledger::{DeploymentStats, Ledger};
use super::mode::DeployMode;
use super::record::DeployRecord;

/// Overall outcome of a deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Success,
    PartialSuccess,
    Failed,
}

impl ReportStatus {
    /// `Failed` when nothing deployed and something failed, `Success` when
    /// nothing failed, otherwise `PartialSuccess`.
    pub fn from_counts(deployed: u64, failed: u64) -> Self {
        if deployed == 0 && failed > 0 {
            ReportStatus::Failed
        } else if failed == 0 {
            ReportStatus::Success
        } else {
            ReportStatus::PartialSuccess
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ReportStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Success => "SUCCESS",
            ReportStatus::PartialSuccess => "PARTIAL_SUCCESS",
            ReportStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage of attempts that deployed. Zero when nothing was attempted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuccessRate(f64);

impl SuccessRate {
    pub fn from_counts(deployed: u64, failed: u64) -> Self {
        let attempts = deployed + failed;
        if attempts == 0 {
            SuccessRate(0.0)
        } else {
            SuccessRate(deployed as f64 / attempts as f64 * 100.0)
        }
    }

    pub fn percent(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for SuccessRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

impl Serialize for SuccessRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_deployed: u64,
    pub total_failed: u64,
    pub success_rate: SuccessRate,
}

/// Final, read-only view of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentReport {
    pub workspace: String,
    pub mode: DeployMode,
    pub summary: Summary,
    pub details: DeploymentStats,
    pub deployment_history: Vec<DeployRecord>,
    pub status: ReportStatus,
}

impl DeploymentReport {
    /// Build from the ledger's current state. Safe to call mid-run.
    pub fn build(workspace: &str, mode: DeployMode, ledger: &Ledger) -> Self {
        let (details, deployment_history) = ledger.snapshot();
        let total_deployed = details.total_deployed();
        let total_failed = details.total_failed();

        Self {
            workspace: workspace.to_string(),
            mode,
            summary: Summary {
                total_deployed,
                total_failed,
                success_rate: SuccessRate::from_counts(total_deployed, total_failed),
            },
            details,
            deployment_history,
            status: ReportStatus::from_counts(total_deployed, total_failed),
        }
    }

    /// Process exit code for this report.
    pub fn exit_code(&self) -> i32 {
        if self.status.is_failure() { 1 } else { 0 }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
